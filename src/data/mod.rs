use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::model::{COLUMNS, OptionChainRow};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Append rows to the CSV file at `path`, creating it if needed.
///
/// The header is written only when the file is new or empty, so repeated
/// calls against one path produce a single header row. Returns the number
/// of data rows written.
pub fn append_rows(path: &Path, rows: &[OptionChainRow]) -> Result<usize, SinkError> {
    let io_err = |source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| SinkError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    let is_empty = file.metadata().map_err(io_err)?.len() == 0;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_empty {
        wtr.write_record(COLUMNS).map_err(csv_err)?;
    }
    for row in rows {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush().map_err(io_err)?;
    Ok(rows.len())
}

/// Write rows with a header to any writer (used for stdout output).
pub fn write_rows<W: std::io::Write>(out: W, rows: &[OptionChainRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Load every row from a recorded CSV file.
pub fn load_rows(path: &Path) -> Result<Vec<OptionChainRow>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV file {}", path.display()))?;
    let rows: Vec<OptionChainRow> = rdr
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parsing CSV file {}", path.display()))?;
    Ok(rows)
}
