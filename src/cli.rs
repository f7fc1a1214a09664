use clap::Parser;
use std::path::PathBuf;

use crate::dashboard::{ClubMetric, Skill};
use crate::dataset::LoadOptions;

/// Command-line arguments for the demo host: load the dataset once,
/// compute one dashboard pass, print it as JSON.
#[derive(Parser, Debug)]
#[command(version, about = "pitchboard")]
pub struct Args {
    /// Path to the player dataset (delimited, with header row)
    pub path: PathBuf,

    /// Specify the delimiter to use when reading the file
    #[arg(long = "delimiter")]
    pub delimiter: Option<u8>,

    /// Specify that the file has no header
    #[arg(long = "no-header")]
    pub no_header: Option<bool>,

    /// Number of rows used to infer column types
    #[arg(long = "infer-schema-rows")]
    pub infer_schema_rows: Option<usize>,

    /// Nationality selection (default from config, initially Brazil)
    #[arg(long)]
    pub nationality: Option<String>,

    /// Skill metric selection
    #[arg(long, value_enum)]
    pub skill: Option<Skill>,

    /// Metric for the club performance chart
    #[arg(long = "club-metric", value_enum)]
    pub club_metric: Option<ClubMetric>,

    /// First player for the head-to-head comparison
    #[arg(long = "player-a")]
    pub player_a: Option<String>,

    /// Second player for the head-to-head comparison
    #[arg(long = "player-b")]
    pub player_b: Option<String>,

    /// Path to a TOML config file with dashboard defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the distinct nationalities in the dataset and exit
    #[arg(long = "list-nationalities", action)]
    pub list_nationalities: bool,

    /// Pretty-print the JSON output
    #[arg(long, action)]
    pub pretty: bool,
}

impl From<&Args> for LoadOptions {
    fn from(args: &Args) -> Self {
        let mut opts = LoadOptions::new();
        if let Some(delimiter) = args.delimiter {
            opts = opts.with_delimiter(delimiter);
        }
        if let Some(no_header) = args.no_header {
            opts = opts.with_has_header(!no_header);
        }
        if let Some(rows) = args.infer_schema_rows {
            opts = opts.with_infer_schema_length(rows);
        }
        opts
    }
}
