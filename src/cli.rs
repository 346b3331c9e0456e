use clap::{Parser, Subcommand};
use std::path::PathBuf;

use option_chain_recorder::fetch::DEFAULT_BASE_URL;

/// Option-chain recorder: snapshot index option chains and append them
/// to a CSV file for later analysis.
#[derive(Parser)]
#[command(name = "option-chain-recorder", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch each symbol's option chain once and append it to the CSV file
    Record {
        /// Index symbols to fetch, in order (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "NIFTY,BANKNIFTY")]
        symbols: Vec<String>,

        /// CSV file to append to (header written on first creation)
        #[arg(long, short = 'o', default_value = "option_chain_data.csv")]
        output: PathBuf,

        /// Seconds to wait between symbols
        #[arg(long, default_value = "10")]
        pace_secs: u64,

        /// HTTP request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,

        /// Provider base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Fetch and flatten without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Flatten a saved option-chain response (JSON) into rows
    Flatten {
        /// Path to the saved response JSON file
        file: PathBuf,

        /// Symbol to tag the rows with
        #[arg(long)]
        symbol: String,

        /// CSV file to append to (default: print CSV to stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the output column schema
    Schema {
        /// Print the JSON Schema of a row instead of the column list
        #[arg(long)]
        json: bool,
    },
}
