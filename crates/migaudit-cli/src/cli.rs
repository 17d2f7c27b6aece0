use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "migaudit",
    about = "migaudit: field-level audit of migrated repository records against legacy exports",
    version
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter (overridden by MIGAUDIT_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a legacy export against a migrated export and write a verdict report
    Compare {
        /// Record type: community, collection, bitstream, or item
        #[arg(long = "type")]
        record_type: String,

        /// Legacy (source) CSV export
        #[arg(long, alias = "input-jupiter")]
        source: PathBuf,

        /// Migrated (target) CSV export
        #[arg(long, alias = "input-dspace")]
        target: PathBuf,

        /// Report CSV path
        #[arg(long)]
        output: PathBuf,

        /// Read empty CSV fields as empty text instead of missing
        #[arg(long)]
        empty_as_text: bool,

        /// Exit with status 2 if any field verdict is FAIL
        #[arg(long)]
        fail_on_mismatch: bool,

        /// Output summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the outer join of both exports for manual review
    Align {
        /// Record type whose join keys are used
        #[arg(long = "type")]
        record_type: String,

        /// Legacy (source) CSV export
        #[arg(long, alias = "input-jupiter")]
        source: PathBuf,

        /// Migrated (target) CSV export
        #[arg(long, alias = "input-dspace")]
        target: PathBuf,

        /// Joined CSV path
        #[arg(long)]
        output: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flatten JSON Lines catalogue records into an allowlisted CSV
    Flatten {
        /// Record type whose column allowlist is used
        #[arg(long = "type")]
        record_type: String,

        /// JSON Lines input, one record per line
        #[arg(long)]
        input: PathBuf,

        /// CSV output path
        #[arg(long)]
        output: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep rows whose id column appears in an ids CSV
    Filter {
        /// CSV to filter
        #[arg(long)]
        input: PathBuf,

        /// Column holding the ids, in both files
        #[arg(long)]
        column: String,

        /// CSV listing the ids to keep
        #[arg(long = "ids", alias = "ids-file")]
        ids: PathBuf,

        /// CSV output path
        #[arg(long)]
        output: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split a CSV into files of at most N rows, each with the header
    Split {
        /// CSV to split
        #[arg(long)]
        input: PathBuf,

        /// Rows per output file
        #[arg(long, alias = "output-file-size")]
        size: usize,

        /// Output path prefix; files are named <prefix>_items_<start>_to_<end>.csv
        #[arg(long)]
        output: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge the legacy item and thesis exports under one header
    Combine {
        /// Item CSV export
        #[arg(long, alias = "input-item")]
        item: PathBuf,

        /// Thesis CSV export
        #[arg(long, alias = "input-thesis")]
        thesis: PathBuf,

        /// Combined CSV path
        #[arg(long)]
        output: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the configured record types with their keys and fields
    RecordTypes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
