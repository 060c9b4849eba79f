//! Main entry point for the census2text CLI application.
//!
//! This binary resolves the requested table against the SF1 packing index,
//! opens the matching geography and data archives over HTTP range requests,
//! and streams the joined rows out as tab-separated text.

use anyhow::{Context, Result};
use clap::Parser;

use census_tools::lookup::{self, TableLocation};
use census_tools::output::{header_row, TabWriter};
use census_tools::{open_remote_archive, Cli, DataRows, GeoRecords, MergeJoin, TableSlice};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let summary_level = lookup::resolve_summary_level(&cli.geography)?;
    let location = lookup::locate_table(lookup::PACKING_INDEX_URL, &cli.table)
        .with_context(|| format!("cannot look up table {}", cli.table))?;

    if !cli.is_quiet() {
        print_banner(&cli.table, &location);
    }

    let (geo_url, data_url) = lookup::archive_urls(cli.state.as_deref(), &location.file_name)?;

    let mut writer = TabWriter::create(cli.output.as_deref())?;
    writer.write_row(&header_row(cli.shape(), &cli.table, location.cell_count)?)?;

    let mut geo_archive = open_remote_archive(&geo_url, cli.progress())
        .with_context(|| format!("cannot open geography archive {geo_url}"))?;
    let mut data_archive = open_remote_archive(&data_url, cli.progress())
        .with_context(|| format!("cannot open data archive {data_url}"))?;

    let join = MergeJoin::new(
        GeoRecords::new(geo_archive.sole_member()?),
        DataRows::new(data_archive.sole_member()?),
        summary_level,
        cli.shape(),
        TableSlice {
            offset: location.column_offset,
            count: location.cell_count,
        },
    );

    let mut rows = 0usize;
    for row in join {
        writer.write_row(&row?)?;
        rows += 1;
    }

    // Display network transfer statistics
    if !cli.is_quiet() {
        let transferred = geo_archive.into_reader().transferred_bytes()
            + data_archive.into_reader().transferred_bytes();
        eprintln!("\n{} rows, {} transferred", rows, format_size(transferred));
    }

    Ok(())
}

/// Echo the packing-index entry for the chosen table to stderr, so the
/// person running the tool can see what the output columns will count.
fn print_banner(table: &str, location: &TableLocation) {
    eprintln!("{}: {} in {}", table, location.name, location.universe);
    eprintln!("{}", "-".repeat(32));
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1048576), "1.00 MB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
