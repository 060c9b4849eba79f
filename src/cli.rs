use std::path::PathBuf;

use clap::Parser;

use crate::io::Progress;
use crate::join::OutputShape;

#[derive(Parser, Debug)]
#[command(name = "census2text")]
#[command(version)]
#[command(about = "Streams US Census 2000 SF1 tables out of remote ZIP archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  census2text -s Nebraska -t P1              population of Nebraska counties\n  \
  census2text -g state -w -t P12 -o out.tsv  age by sex per state, with coordinates\n  \
  census2text -s California -g 140 -t P1     numeric summary levels work too")]
pub struct Cli {
    /// Write TSV to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Summary level: state, county, tract, block, or a 3-digit code
    #[arg(
        short = 'g',
        long = "geography",
        value_name = "LEVEL",
        default_value = "county"
    )]
    pub geography: String,

    /// Census table, e.g. P1 or P12A
    #[arg(short = 't', long = "table", value_name = "TABLE", default_value = "P1")]
    pub table: String,

    /// Full state name, e.g. Nebraska; omit for the national files
    #[arg(short = 's', long = "state", value_name = "STATE")]
    pub state: Option<String>,

    /// Only the four FIPS/geography identifier columns
    #[arg(short = 'n', long = "narrow", conflicts_with = "wide")]
    pub narrow: bool,

    /// Append the decoded coordinates to the normal columns
    #[arg(short = 'w', long = "wide")]
    pub wide: bool,

    /// Suppress all progress output
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report every fetched block on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn shape(&self) -> OutputShape {
        if self.narrow {
            OutputShape::Narrow
        } else if self.wide {
            OutputShape::Wide
        } else {
            OutputShape::Normal
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn progress(&self) -> Progress {
        if self.quiet {
            Progress::Quiet
        } else if self.verbose {
            Progress::Verbose
        } else {
            Progress::Normal
        }
    }
}
