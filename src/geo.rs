//! Fixed-width geography records.
//!
//! SF1 geography files carry one record per line with a fixed column
//! layout published by the Census Bureau. The layout is a provider
//! contract: byte offsets below are 0-indexed and end-exclusive, and are
//! not configurable.

use std::io::{BufRead, BufReader, Read};

use crate::error::{Error, Result};

const SUMLEV: (usize, usize) = (8, 11);
const GEOCOMP: (usize, usize) = (11, 13);
const LOGRECNO: (usize, usize) = (18, 25);
const STATE: (usize, usize) = (29, 31);
const COUNTY: (usize, usize) = (31, 34);
const TRACT: (usize, usize) = (55, 61);
const BLOCK: (usize, usize) = (62, 66);
const NAME: (usize, usize) = (200, 290);
const LATITUDE: (usize, usize) = (310, 319);
const LONGITUDE: (usize, usize) = (319, 329);

/// Every field the decoder touches fits inside this prefix of the record.
const MIN_RECORD_LEN: usize = LONGITUDE.1;

/// One decoded geography record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoRecord {
    pub logrecno: String,
    pub sumlev: String,
    pub geocomp: String,
    pub state: String,
    pub county: String,
    pub tract: String,
    pub block: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}

impl GeoRecord {
    /// Decode one fixed-width line. `number` is the 1-based line number,
    /// carried into decode errors.
    pub fn from_line(line: &[u8], number: usize) -> Result<Self> {
        if line.len() < MIN_RECORD_LEN {
            return Err(Error::GeoDecode {
                line: number,
                reason: format!("record too short: {} bytes", line.len()),
            });
        }

        let field =
            |(start, end): (usize, usize)| String::from_utf8_lossy(&line[start..end]).trim().to_string();

        let coordinate = |range| {
            decode_coordinate(&field(range)).map_err(|reason| Error::GeoDecode {
                line: number,
                reason,
            })
        };

        Ok(Self {
            logrecno: field(LOGRECNO),
            sumlev: field(SUMLEV),
            geocomp: field(GEOCOMP),
            state: field(STATE),
            county: field(COUNTY),
            tract: field(TRACT),
            block: field(BLOCK),
            name: field(NAME),
            latitude: coordinate(LATITUDE)?,
            longitude: coordinate(LONGITUDE)?,
        })
    }
}

/// Decode a sign-magnitude fixed-point coordinate field.
///
/// The first character is the sign, the trailing six characters are the
/// fraction digits, and whatever sits between them is the integer part
/// with leading zeros stripped (an all-zero integer part renders as `0`).
/// A positive sign is dropped from the output.
fn decode_coordinate(raw: &str) -> std::result::Result<String, String> {
    if !raw.is_ascii() {
        return Err(format!("non-ASCII coordinate field {raw:?}"));
    }
    if raw.len() < 7 {
        return Err(format!("coordinate field too short: {raw:?}"));
    }

    let (sign, rest) = raw.split_at(1);
    if sign != "+" && sign != "-" {
        return Err(format!("coordinate field has no sign: {raw:?}"));
    }

    let (integer, fraction) = rest.split_at(rest.len() - 6);
    let integer = integer.trim_start_matches('0');
    let integer = if integer.is_empty() { "0" } else { integer };
    let sign = if sign == "-" { "-" } else { "" };

    Ok(format!("{sign}{integer}.{fraction}"))
}

/// Lazy sequence of decoded geography records read off a byte stream.
///
/// Empty lines are skipped; any other malformed line ends the sequence
/// with a decode error.
pub struct GeoRecords<R: Read> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    line: usize,
}

impl<R: Read> GeoRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::new(),
            line: 0,
        }
    }
}

impl<R: Read> Iterator for GeoRecords<R> {
    type Item = Result<GeoRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                        self.buf.pop();
                    }
                    if self.buf.is_empty() {
                        continue;
                    }
                    return Some(GeoRecord::from_line(&self.buf, self.line));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
