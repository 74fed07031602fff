//! Errors raised by the I/O surfaces around the calculators
//!
//! The calculators themselves are infallible; only loading requests, reading
//! cash-flow files and writing reports can fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cash-flow file {path} has no rows")]
    EmptyCashFlows { path: PathBuf },

    #[error("cash-flow file {path} row {row}: {message}")]
    CashFlowRow {
        path: PathBuf,
        row: usize,
        message: String,
    },
}

impl CalcError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CalcError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
