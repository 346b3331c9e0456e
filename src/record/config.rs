use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::fetch::FetchConfig;

pub const DEFAULT_SYMBOLS: [&str; 2] = ["NIFTY", "BANKNIFTY"];
pub const DEFAULT_OUTPUT: &str = "option_chain_data.csv";
pub const DEFAULT_PACE: Duration = Duration::from_secs(10);

/// Runtime configuration for the `record` command.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Index symbols, fetched in this order.
    pub symbols: Vec<String>,
    /// CSV file every run appends to.
    pub output: PathBuf,
    /// Wait between consecutive symbols.
    pub pace: Duration,
    /// Fetch and flatten, but don't write.
    pub dry_run: bool,
    pub fetch: FetchConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        RecorderConfig {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            pace: DEFAULT_PACE,
            dry_run: false,
            fetch: FetchConfig::default(),
        }
    }
}

impl RecorderConfig {
    pub fn from_cli(cli: &crate::record::RecordArgs) -> Result<Self> {
        let symbols = normalize_symbols(&cli.symbols)?;
        if cli.timeout_secs == 0 {
            bail!("--timeout-secs must be greater than zero");
        }

        Ok(RecorderConfig {
            symbols,
            output: cli.output.clone(),
            pace: Duration::from_secs(cli.pace_secs),
            dry_run: cli.dry_run,
            fetch: FetchConfig {
                base_url: cli.base_url.clone(),
                timeout: Duration::from_secs(cli.timeout_secs),
            },
        })
    }
}

/// Trim and upper-case symbols; reject blanks and an empty list.
pub fn normalize_symbols(raw: &[String]) -> Result<Vec<String>> {
    let mut symbols = Vec::with_capacity(raw.len());
    for s in raw {
        let sym = s.trim().to_uppercase();
        if sym.is_empty() {
            bail!("Empty symbol in symbol list {:?}", raw);
        }
        symbols.push(sym);
    }
    if symbols.is_empty() {
        bail!("No symbols to record. Pass at least one with --symbols.");
    }
    Ok(symbols)
}
