pub mod arrow_table;
pub mod dataframe;
pub mod parquet;
pub mod query;
pub use arrow_table::{ArrowImporter, ArrowTable};
pub use dataframe::PolarsImporter;
pub use parquet::ParquetFileImporter;
pub use query::{DuckDBImporter, QueryResult};

use crate::error::Result;
use polars::prelude::LazyFrame;

/// A data source that can produce a Polars [LazyFrame].
///
/// Importers hold the original input only until the lazy frame is built.
/// They do not check the schema; that is left to [crate::IntervalDF].
pub trait Importer {
    /// Convert this source into a [LazyFrame] without evaluating it.
    fn to_lazy_frame(&self) -> Result<LazyFrame>;
}
