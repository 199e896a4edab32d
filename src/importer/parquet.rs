use crate::error::{DuckRangesError, Result};
use crate::importer::Importer;
use crate::options::PathOptions;
use crate::utils::{parquet_files_in_dir, PARQUET_EXTENSIONS};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Imports a Parquet file, or a directory of Parquet files, as a lazy scan.
///
/// The path is validated on construction: it must exist and either be a
/// directory or end with `.parquet`/`.parq`. No data is read until the lazy
/// frame is collected, apart from the Parquet footers Polars reads to learn
/// the schema.
pub struct ParquetFileImporter {
    path: PathBuf,
}

impl ParquetFileImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<ParquetFileImporter> {
        let path = PathOptions::parquet().validate(path)?;
        Ok(ParquetFileImporter { path })
    }

    /// The validated, absolute path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Importer for ParquetFileImporter {
    fn to_lazy_frame(&self) -> Result<LazyFrame> {
        if !self.path.is_dir() {
            return Ok(LazyFrame::scan_parquet(
                &self.path,
                ScanArgsParquet::default(),
            )?);
        }

        // partitioned dataset: scan every file and stack the scans
        let files = parquet_files_in_dir(&self.path)?;
        if files.is_empty() {
            return Err(DuckRangesError::InvalidFormat {
                path: self.path.clone(),
                allowed: PARQUET_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            });
        }
        debug!(
            "scanning {} parquet files under {:?}",
            files.len(),
            self.path
        );
        let scans = files
            .iter()
            .map(|f| LazyFrame::scan_parquet(f, ScanArgsParquet::default()))
            .collect::<PolarsResult<Vec<LazyFrame>>>()?;
        Ok(concat(scans, UnionArgs::default())?)
    }
}
