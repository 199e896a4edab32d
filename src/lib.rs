//! duckranges brings genomic intervals from several tabular sources into a single
//! [Polars](https://pola.rs/) [LazyFrame](polars::prelude::LazyFrame).
//!
//! An [IntervalDF] can be built from an in-memory Polars `DataFrame`, an
//! Arrow table, a [DuckDB](https://duckdb.org/) query result, or a Parquet
//! file (or a directory of Parquet files). Whatever the source, the result is
//! a lazily evaluated frame that is guaranteed to carry the `chr`, `start` and
//! `end` columns. Query planning, file scanning and evaluation are left to
//! Polars; duckranges only does the ingestion and the column check.

pub mod error;
pub mod importer;
pub mod interval_df;
pub mod options;
pub mod utils;
pub mod validation;
pub use error::{DuckRangesError, Result};
pub use interval_df::{IntervalDF, IntervalSource};
pub use validation::validate_file_path;

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
