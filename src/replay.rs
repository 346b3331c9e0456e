use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data;
use crate::flatten;
use crate::model::RawSnapshot;

/// Flatten a saved upstream response and append it, or print it as CSV.
pub fn run(snapshot_path: &Path, symbol: &str, output: Option<&PathBuf>) -> Result<()> {
    let contents = std::fs::read_to_string(snapshot_path)
        .with_context(|| format!("reading snapshot {}", snapshot_path.display()))?;
    let raw: RawSnapshot = serde_json::from_str(&contents)
        .with_context(|| format!("parsing snapshot {}", snapshot_path.display()))?;

    let symbol = symbol.trim().to_uppercase();
    let stats = flatten::count_legs(&raw);
    if stats.orphan_strikes > 0 {
        eprintln!(
            "WARN: {} strike records on unlisted expiries dropped",
            stats.orphan_strikes
        );
    }

    let rows = flatten::flatten(&raw, &symbol, chrono::Local::now().naive_local())?;

    match output {
        Some(path) => {
            let written = data::append_rows(path, &rows)?;
            println!("Appended {} {} rows to {}", written, symbol, path.display());
        }
        None => data::write_rows(std::io::stdout().lock(), &rows)?,
    }
    Ok(())
}
