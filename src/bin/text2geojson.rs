//! Main entry point for the text2geojson CLI application.
//!
//! This binary turns census2text's wide tab-separated output into a GeoJSON
//! `FeatureCollection`, one point feature per row, keyed by the header line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use census_tools::geojson::{self, FeatureCollection};

#[derive(Parser, Debug)]
#[command(name = "text2geojson")]
#[command(version)]
#[command(about = "Converts census2text output to a GeoJSON FeatureCollection", long_about = None)]
#[command(after_help = "Examples:\n  \
  census2text -s Delaware -w | text2geojson -o counties.json\n  \
  text2geojson -i 2 counties.tsv             pretty-print with a 2-space indent")]
struct Cli {
    /// Tab-separated input file produced with census2text -w (default: stdin)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write GeoJSON to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print with an N-space indent
    #[arg(short = 'i', long = "indent", value_name = "N")]
    indent: Option<usize>,

    /// Decimal places kept in coordinates
    #[arg(short = 'p', long = "precision", value_name = "N", default_value_t = 5)]
    precision: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let reader: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };
    let mut lines = BufReader::new(reader).lines();

    let headers: Vec<String> = match lines.next() {
        Some(first) => split_row(&first?),
        None => bail!("input is empty, expected a census2text header line"),
    };

    let mut features = Vec::new();
    for line in lines {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let cells = split_row(&line);
        features.push(geojson::feature_from_row(
            &headers,
            &cells,
            cli.precision,
            features.len() + 1,
        )?);
    }

    let collection = FeatureCollection::new(features);
    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    geojson::write_collection(writer, &collection, cli.indent)?;

    Ok(())
}

fn split_row(line: &str) -> Vec<String> {
    line.trim_end_matches('\r')
        .split('\t')
        .map(String::from)
        .collect()
}
