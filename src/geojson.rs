//! GeoJSON rendering of joined census rows.
//!
//! Every tabular row becomes a point feature: the whole row, headers as
//! keys, lands in `properties`, and the `Longitude`/`Latitude` columns
//! become the point coordinates.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    pub properties: BTreeMap<String, String>,
    pub geometry: Geometry,
}

#[derive(Debug, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    kind: &'static str,
    /// Longitude first, as GeoJSON positions require.
    pub coordinates: [f64; 2],
}

/// Convert one tabular row into a point feature.
///
/// `line` is the 1-based row number, carried into conversion errors.
pub fn feature_from_row(
    headers: &[String],
    cells: &[String],
    precision: u8,
    line: usize,
) -> Result<Feature> {
    if cells.len() != headers.len() {
        return Err(Error::GeoJson {
            line,
            reason: format!(
                "row has {} cells but the header has {} columns",
                cells.len(),
                headers.len()
            ),
        });
    }

    let properties: BTreeMap<String, String> =
        headers.iter().cloned().zip(cells.iter().cloned()).collect();

    let latitude = coordinate(&properties, "Latitude", line)?;
    let longitude = coordinate(&properties, "Longitude", line)?;

    Ok(Feature {
        kind: "Feature",
        properties,
        geometry: Geometry {
            kind: "Point",
            coordinates: [round(longitude, precision), round(latitude, precision)],
        },
    })
}

fn coordinate(properties: &BTreeMap<String, String>, key: &str, line: usize) -> Result<f64> {
    let raw = properties.get(key).ok_or_else(|| Error::GeoJson {
        line,
        reason: format!("missing {key} column"),
    })?;

    raw.parse().map_err(|_| Error::GeoJson {
        line,
        reason: format!("{key} {raw:?} is not a number"),
    })
}

fn round(value: f64, precision: u8) -> f64 {
    let scale = 10f64.powi(i32::from(precision));
    (value * scale).round() / scale
}

/// Serialize `collection`, compact by default or pretty-printed with an
/// `indent`-space step.
pub fn write_collection<W: Write>(
    mut writer: W,
    collection: &FeatureCollection,
    indent: Option<usize>,
) -> Result<()> {
    match indent {
        None => serde_json::to_writer(&mut writer, collection)?,
        Some(width) => {
            let pad = vec![b' '; width];
            let formatter = PrettyFormatter::with_indent(&pad);
            let mut serializer = Serializer::with_formatter(&mut writer, formatter);
            collection.serialize(&mut serializer)?;
        }
    }
    Ok(())
}
