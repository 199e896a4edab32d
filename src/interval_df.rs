use crate::error::{DuckRangesError, Result};
use crate::importer::{
    ArrowImporter, ArrowTable, DuckDBImporter, Importer, ParquetFileImporter, PolarsImporter,
    QueryResult,
};
use crate::utils::{setdiff, REQUIRED_COLUMNS};
use polars::prelude::{DataFrame, LazyFrame};
use std::any::Any;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The inputs an [IntervalDF] can be built from.
///
/// Each variant maps to exactly one importer:
///
/// * `DataFrame`: an in-memory Polars frame ([PolarsImporter]).
/// * `Arrow`: an Arrow table ([ArrowImporter]).
/// * `Query`: a DuckDB query result ([DuckDBImporter]).
/// * `Path`: a Parquet file or a directory of Parquet files ([ParquetFileImporter]).
///
/// Every supported input type converts into an [IntervalSource] with `From`,
/// so [IntervalDF::new] can be called with the input directly.
pub enum IntervalSource {
    DataFrame(DataFrame),
    Arrow(ArrowTable),
    Query(QueryResult),
    Path(PathBuf),
}

impl IntervalSource {
    /// A short description of the variant, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            IntervalSource::DataFrame(_) => "polars DataFrame",
            IntervalSource::Arrow(_) => "arrow table",
            IntervalSource::Query(_) => "duckdb query result",
            IntervalSource::Path(_) => "parquet path",
        }
    }

    /// Builds an [IntervalSource] from a value whose type is only known at runtime.
    ///
    /// The supported types are tried in order: [DataFrame], [ArrowTable],
    /// [QueryResult], and then the path-like types [String], `&'static str`
    /// and [PathBuf]. An [IntervalSource] is passed through. Any other type
    /// fails with [DuckRangesError::UnsupportedType] naming that type.
    pub fn from_any<T: Any>(data: T) -> Result<IntervalSource> {
        let data: Box<dyn Any> = Box::new(data);
        let data = match data.downcast::<DataFrame>() {
            Ok(df) => return Ok(IntervalSource::DataFrame(*df)),
            Err(data) => data,
        };
        let data = match data.downcast::<ArrowTable>() {
            Ok(table) => return Ok(IntervalSource::Arrow(*table)),
            Err(data) => data,
        };
        let data = match data.downcast::<QueryResult>() {
            Ok(query) => return Ok(IntervalSource::Query(*query)),
            Err(data) => data,
        };
        let data = match data.downcast::<String>() {
            Ok(path) => return Ok(IntervalSource::Path(PathBuf::from(*path))),
            Err(data) => data,
        };
        let data = match data.downcast::<&'static str>() {
            Ok(path) => return Ok(IntervalSource::Path(PathBuf::from(*path))),
            Err(data) => data,
        };
        let data = match data.downcast::<PathBuf>() {
            Ok(path) => return Ok(IntervalSource::Path(*path)),
            Err(data) => data,
        };
        match data.downcast::<IntervalSource>() {
            Ok(source) => Ok(*source),
            Err(_) => Err(DuckRangesError::unsupported_type(std::any::type_name::<T>())),
        }
    }

    fn into_importer(self) -> Result<Box<dyn Importer>> {
        let importer: Box<dyn Importer> = match self {
            IntervalSource::DataFrame(df) => Box::new(PolarsImporter::new(df)),
            IntervalSource::Arrow(table) => Box::new(ArrowImporter::new(table)),
            IntervalSource::Query(query) => Box::new(DuckDBImporter::new(query)),
            IntervalSource::Path(path) => Box::new(ParquetFileImporter::new(path)?),
        };
        Ok(importer)
    }
}

impl From<DataFrame> for IntervalSource {
    fn from(df: DataFrame) -> Self {
        IntervalSource::DataFrame(df)
    }
}

impl From<ArrowTable> for IntervalSource {
    fn from(table: ArrowTable) -> Self {
        IntervalSource::Arrow(table)
    }
}

impl From<QueryResult> for IntervalSource {
    fn from(query: QueryResult) -> Self {
        IntervalSource::Query(query)
    }
}

impl From<PathBuf> for IntervalSource {
    fn from(path: PathBuf) -> Self {
        IntervalSource::Path(path)
    }
}

impl From<&Path> for IntervalSource {
    fn from(path: &Path) -> Self {
        IntervalSource::Path(path.to_path_buf())
    }
}

impl From<String> for IntervalSource {
    fn from(path: String) -> Self {
        IntervalSource::Path(PathBuf::from(path))
    }
}

impl From<&str> for IntervalSource {
    fn from(path: &str) -> Self {
        IntervalSource::Path(PathBuf::from(path))
    }
}

/// A validated, lazily evaluated table of genomic intervals.
///
/// An [IntervalDF] wraps a Polars [LazyFrame] that is guaranteed to have the
/// columns `chr`, `start` and `end`. Any other columns are passed through
/// untouched, and no column types are checked or converted. The frame is
/// only evaluated when [IntervalDF::to_polars] is called.
///
/// ### Example
///
/// ```rust
/// use duckranges::IntervalDF;
/// use polars::prelude::*;
///
/// let df = df!(
///     "chr" => ["chr1", "chr1"],
///     "start" => [1i64, 20],
///     "end" => [10i64, 30],
///     "name" => ["a", "b"],
/// )?;
/// let idf = IntervalDF::new(df)?;
/// assert_eq!(idf.columns()?, vec!["chr", "start", "end", "name"]);
/// assert_eq!(idf.to_polars()?.height(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct IntervalDF {
    lazy_df: LazyFrame,
}

impl IntervalDF {
    /// Creates a new [IntervalDF] from any supported input.
    ///
    /// ### Returns
    ///
    /// * [Ok]`(IntervalDF)` if the input could be imported and carries the required columns.
    /// * [DuckRangesError::MissingColumns] if any of `chr`, `start`, `end` is absent.
    /// * The path validation errors for a [IntervalSource::Path] input.
    /// * Any error Polars, Arrow or DuckDB raised while importing.
    pub fn new<S: Into<IntervalSource>>(data: S) -> Result<IntervalDF> {
        let source = data.into();
        debug!("building IntervalDF from a {}", source.kind());
        let lazy_df = source.into_importer()?.to_lazy_frame()?;

        let idf = IntervalDF { lazy_df };
        idf.validate_columns()?;
        Ok(idf)
    }

    /// Creates a new [IntervalDF] from a value whose type is only known at
    /// runtime. See [IntervalSource::from_any] for the accepted types.
    pub fn from_any<T: Any>(data: T) -> Result<IntervalDF> {
        IntervalDF::new(IntervalSource::from_any(data)?)
    }

    fn validate_columns(&self) -> Result<()> {
        let required: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let missing = setdiff(&required, &self.columns()?);
        if !missing.is_empty() {
            return Err(DuckRangesError::MissingColumns { missing });
        }
        Ok(())
    }

    /// The column names of the lazy frame, in schema order. Only the schema
    /// is resolved; no data is evaluated.
    pub fn columns(&self) -> Result<Vec<String>> {
        let schema = self.lazy_df.schema()?;
        Ok(schema.iter_names().map(|n| n.to_string()).collect())
    }

    /// Returns the underlying lazy frame.
    pub fn lazy_df(&self) -> &LazyFrame {
        &self.lazy_df
    }

    pub fn into_lazy(self) -> LazyFrame {
        self.lazy_df
    }

    /// Evaluates the lazy frame and returns the resulting [DataFrame].
    /// Errors raised by Polars during evaluation are returned as is.
    pub fn to_polars(&self) -> Result<DataFrame> {
        Ok(self.lazy_df.clone().collect()?)
    }
}

impl std::fmt::Debug for IntervalDF {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalDF")
            .field("columns", &self.columns().unwrap_or_default())
            .finish()
    }
}

impl TryFrom<DataFrame> for IntervalDF {
    type Error = DuckRangesError;

    fn try_from(df: DataFrame) -> Result<IntervalDF> {
        IntervalDF::new(df)
    }
}

impl TryFrom<ArrowTable> for IntervalDF {
    type Error = DuckRangesError;

    fn try_from(table: ArrowTable) -> Result<IntervalDF> {
        IntervalDF::new(table)
    }
}

impl TryFrom<QueryResult> for IntervalDF {
    type Error = DuckRangesError;

    fn try_from(query: QueryResult) -> Result<IntervalDF> {
        IntervalDF::new(query)
    }
}

impl TryFrom<PathBuf> for IntervalDF {
    type Error = DuckRangesError;

    fn try_from(path: PathBuf) -> Result<IntervalDF> {
        IntervalDF::new(path)
    }
}
