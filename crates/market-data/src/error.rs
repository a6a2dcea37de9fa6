use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read market data file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Market data is not a valid document: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("No instrument with symbol '{0}' in the market data.")]
    UnknownSymbol(String),
}
