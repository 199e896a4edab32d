use crate::error::Result;
use crate::importer::Importer;
use polars::prelude::{DataFrame, IntoLazy, LazyFrame};

/// Imports an in-memory Polars [DataFrame].
///
/// The frame's columns are reference counted, so building the lazy frame
/// does not copy the data.
pub struct PolarsImporter {
    df: DataFrame,
}

impl PolarsImporter {
    pub fn new(df: DataFrame) -> PolarsImporter {
        PolarsImporter { df }
    }
}

impl Importer for PolarsImporter {
    fn to_lazy_frame(&self) -> Result<LazyFrame> {
        Ok(self.df.clone().lazy())
    }
}
