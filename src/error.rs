//! Error types shared by every part of the crate.
//!
//! Failures detected by `duckranges` itself (unsupported inputs, missing
//! genomic columns and the path checks) have their own variants. Errors raised
//! by Polars, DuckDB or Arrow are carried through untouched.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuckRangesError {
    /// The input matches none of the supported sources
    #[error("Unsupported data type: {type_name}")]
    UnsupportedType { type_name: String },

    /// One or more of `chr`, `start`, `end` is absent from the lazy frame
    #[error("Missing required genomic columns: {missing:?}")]
    MissingColumns { missing: Vec<String> },

    #[error("Path does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Expected file but got directory: {}", path.display())]
    IsDirectory { path: PathBuf },

    #[error("Invalid file format. Allowed extensions: {allowed:?}\nPath: {}", path.display())]
    InvalidFormat { path: PathBuf, allowed: Vec<String> },

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    DuckDb(#[from] duckdb::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Type alias for Results using [DuckRangesError]
pub type Result<T> = std::result::Result<T, DuckRangesError>;

impl DuckRangesError {
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// The missing columns, if this is a [DuckRangesError::MissingColumns] error.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            Self::MissingColumns { missing } => Some(missing.as_slice()),
            _ => None,
        }
    }
}
