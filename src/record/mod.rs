pub mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data;
use crate::fetch::{NseClient, SnapshotSource};
use crate::flatten;

pub use config::RecorderConfig;

/// CLI-facing arguments for the `record` command (before validation).
pub struct RecordArgs {
    pub symbols: Vec<String>,
    pub output: PathBuf,
    pub pace_secs: u64,
    pub timeout_secs: u64,
    pub base_url: String,
    pub dry_run: bool,
}

/// Outcome counts for one pass over the symbol list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub rows_written: usize,
}

/// Entry point for the `record` command.
pub fn run(args: &RecordArgs) -> Result<()> {
    let config = RecorderConfig::from_cli(args)?;

    println!("=== option-chain-recorder ===");
    println!("Symbols:  {}", config.symbols.join(", "));
    println!("Output:   {}", config.output.display());
    println!("Source:   {}", config.fetch.base_url);
    println!("Pace:     {}s", config.pace.as_secs());
    println!("Dry run:  {}", config.dry_run);
    println!();

    let client = NseClient::new(&config.fetch)?;
    let recorder = Recorder::new(config);

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    let summary = rt.block_on(recorder.run(&client))?;

    println!(
        "\nDone: {} succeeded, {} failed. Wrote {} rows to {}",
        summary.succeeded,
        summary.failed,
        summary.rows_written,
        recorder.config().output.display()
    );
    Ok(())
}

/// Sequential fetch → flatten → append over the configured symbols.
pub struct Recorder {
    config: RecorderConfig,
}

impl Recorder {
    pub fn new(config: RecorderConfig) -> Self {
        Recorder { config }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Record every symbol once.
    ///
    /// Fetch and flatten failures skip the symbol; a failed write to the
    /// output file aborts the pass.
    pub async fn run<S: SnapshotSource + ?Sized>(&self, source: &S) -> Result<RunSummary> {
        let total = self.config.symbols.len();
        let mut summary = RunSummary::default();

        for (i, symbol) in self.config.symbols.iter().enumerate() {
            if i > 0 && !self.config.pace.is_zero() {
                tokio::time::sleep(self.config.pace).await;
            }

            println!("[{}/{}] Fetching {} ...", i + 1, total, symbol);

            let raw = match source.fetch(symbol).await {
                Ok(raw) => raw,
                Err(e) => {
                    eprintln!("  WARN  {} fetch failed ({}): {}. Skipping.", symbol, e.reason(), e);
                    summary.failed += 1;
                    continue;
                }
            };

            let stats = flatten::count_legs(&raw);
            if stats.orphan_strikes > 0 {
                eprintln!(
                    "  WARN  {}: {} strike records on unlisted expiries dropped",
                    symbol, stats.orphan_strikes
                );
            }

            let captured_at = chrono::Local::now().naive_local();
            let rows = match flatten::flatten(&raw, symbol, captured_at) {
                Ok(rows) => rows,
                Err(e) => {
                    eprintln!("  WARN  {}. Skipping.", e);
                    summary.failed += 1;
                    continue;
                }
            };

            if self.config.dry_run {
                println!("  DRY   {} → {} rows (not written)", symbol, rows.len());
            } else {
                let written = data::append_rows(&self.config.output, &rows)
                    .with_context(|| format!("appending {} rows for {}", rows.len(), symbol))?;
                summary.rows_written += written;
                println!(
                    "  OK    {} → {} ({} rows)",
                    symbol,
                    self.config.output.display(),
                    written
                );
            }
            summary.succeeded += 1;
        }

        Ok(summary)
    }
}
