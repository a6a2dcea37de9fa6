//! # GSE Watch Exporter
//!
//! Writes a selected price window as a CSV download. Optional per-row fields are
//! passed through unchanged; absent values become empty fields.

use core_types::PriceSample;
use std::fs::File;
use std::io;
use std::path::Path;

pub mod error;

pub use error::ExportError;

/// Column header of every export.
pub const HEADER: [&str; 6] = ["date", "symbol", "close", "volume", "change", "changePercent"];

/// The download file name used for a symbol, e.g. `GCB_GSE_data.csv`.
pub fn default_file_name(symbol: &str) -> String {
    format!("{}_GSE_data.csv", symbol.trim().to_uppercase())
}

/// Writes `samples` as CSV rows to `writer`, in order, and returns the number of rows written.
pub fn write_csv<'a, W, I>(writer: W, symbol: &str, samples: I) -> Result<usize, ExportError>
where
    W: io::Write,
    I: IntoIterator<Item = &'a PriceSample>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    let mut rows = 0;
    for sample in samples {
        csv_writer.write_record([
            sample.date.to_string(),
            symbol.to_string(),
            optional(sample.close),
            optional(sample.volume),
            optional(sample.change),
            optional(sample.change_percent),
        ])?;
        rows += 1;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

/// Creates (or truncates) the file at `path` and writes the export into it.
pub fn export_to_file<'a, I>(path: &Path, symbol: &str, samples: I) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a PriceSample>,
{
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = write_csv(file, symbol, samples)?;

    tracing::info!(path = %path.display(), symbol, rows, "Exported price history");
    Ok(rows)
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
