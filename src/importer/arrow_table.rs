use crate::error::Result;
use crate::importer::Importer;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;
use polars::prelude::{DataFrame, IntoLazy, IpcStreamReader, LazyFrame, SerReader};
use std::io::Cursor;
use tracing::trace;

/// An Arrow table: one schema and any number of record batches sharing it.
///
/// This is the interchange representation between the relational engine
/// (DuckDB returns query results as Arrow batches) and Polars.
///
/// ### Example
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{Int64Array, StringArray};
/// use arrow::datatypes::{DataType, Field, Schema};
/// use arrow::record_batch::RecordBatch;
/// use duckranges::importer::ArrowTable;
///
/// let schema = Arc::new(Schema::new(vec![
///     Field::new("chr", DataType::Utf8, false),
///     Field::new("start", DataType::Int64, false),
///     Field::new("end", DataType::Int64, false),
/// ]));
/// let batch = RecordBatch::try_new(
///     schema.clone(),
///     vec![
///         Arc::new(StringArray::from(vec!["chr1"])),
///         Arc::new(Int64Array::from(vec![1])),
///         Arc::new(Int64Array::from(vec![10])),
///     ],
/// )?;
/// let table = ArrowTable::try_new(schema, vec![batch])?;
/// assert_eq!(table.num_rows(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct ArrowTable {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl ArrowTable {
    /// Creates a table from a schema and batches. Every batch must have the
    /// same fields as `schema`; schema-level metadata is not compared.
    pub fn try_new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<ArrowTable> {
        for (idx, batch) in batches.iter().enumerate() {
            if batch.schema().fields() != schema.fields() {
                return Err(ArrowError::SchemaError(format!(
                    "Record batch {} does not match the table schema. Expected {:?}, found {:?}",
                    idx,
                    schema.fields(),
                    batch.schema().fields()
                ))
                .into());
            }
        }
        Ok(ArrowTable { schema, batches })
    }

    /// Creates a table from batches, taking the schema of the first one.
    pub fn from_batches(batches: Vec<RecordBatch>) -> Result<ArrowTable> {
        let schema = match batches.first() {
            Some(first) => first.schema(),
            None => {
                return Err(ArrowError::InvalidArgumentError(String::from(
                    "Cannot infer a schema from zero record batches. Use ArrowTable::try_new instead.",
                ))
                .into())
            }
        };
        ArrowTable::try_new(schema, batches)
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.fields().iter().map(|f| f.name().clone()).collect()
    }

    /// Converts the table into a Polars [DataFrame].
    ///
    /// The batches are passed through the Arrow IPC stream format, which
    /// both arrow-rs and Polars speak natively.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut writer = StreamWriter::try_new(&mut buffer, &self.schema)?;
            for batch in self.batches.iter() {
                writer.write(batch)?;
            }
            writer.finish()?;
        }
        trace!(
            "encoded {} record batches into {} IPC bytes",
            self.batches.len(),
            buffer.len()
        );
        let df = IpcStreamReader::new(Cursor::new(buffer)).finish()?;
        Ok(df)
    }
}

impl From<RecordBatch> for ArrowTable {
    fn from(batch: RecordBatch) -> ArrowTable {
        ArrowTable {
            schema: batch.schema(),
            batches: vec![batch],
        }
    }
}

/// Imports an [ArrowTable] by converting it to a Polars [DataFrame] first.
pub struct ArrowImporter {
    table: ArrowTable,
}

impl ArrowImporter {
    pub fn new(table: ArrowTable) -> ArrowImporter {
        ArrowImporter { table }
    }
}

impl Importer for ArrowImporter {
    fn to_lazy_frame(&self) -> Result<LazyFrame> {
        Ok(self.table.to_dataframe()?.lazy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DuckRangesError;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use polars::prelude::{df, NamedFrom};
    use std::sync::Arc;

    fn interval_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("chr", DataType::Utf8, false),
            Field::new("start", DataType::Int64, false),
            Field::new("end", DataType::Int64, false),
        ]))
    }

    fn interval_batch(chr: Vec<&str>, start: Vec<i64>, end: Vec<i64>) -> RecordBatch {
        RecordBatch::try_new(
            interval_schema(),
            vec![
                Arc::new(StringArray::from(chr)),
                Arc::new(Int64Array::from(start)),
                Arc::new(Int64Array::from(end)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_to_dataframe_concatenates_batches() -> anyhow::Result<()> {
        let table = ArrowTable::try_new(
            interval_schema(),
            vec![
                interval_batch(vec!["chr1", "chr1"], vec![1, 21], vec![10, 30]),
                interval_batch(vec!["chr2"], vec![5], vec![8]),
            ],
        )?;
        assert_eq!(table.num_rows(), 3);

        let df = table.to_dataframe()?;
        let expected = df!(
            "chr" => ["chr1", "chr1", "chr2"],
            "start" => [1i64, 21, 5],
            "end" => [10i64, 30, 8],
        )?;
        assert_eq!(df, expected);
        Ok(())
    }

    #[test]
    fn test_empty_table_keeps_columns() -> anyhow::Result<()> {
        let table = ArrowTable::try_new(interval_schema(), vec![])?;
        let lf = ArrowImporter::new(table).to_lazy_frame()?;
        let df = lf.collect()?;
        assert_eq!(df.height(), 0);
        assert_eq!(df.get_column_names(), vec!["chr", "start", "end"]);
        Ok(())
    }

    #[test]
    fn test_mismatched_batch_is_rejected() {
        let other = Arc::new(Schema::new(vec![Field::new("chr", DataType::Utf8, false)]));
        let batch = RecordBatch::try_new(
            other,
            vec![Arc::new(StringArray::from(vec!["chr1"]))],
        )
        .unwrap();
        let err = ArrowTable::try_new(interval_schema(), vec![batch]).unwrap_err();
        assert!(matches!(err, DuckRangesError::Arrow(ArrowError::SchemaError(_))));
    }

    #[test]
    fn test_from_batches() {
        let table = ArrowTable::from(interval_batch(vec!["chr1"], vec![1], vec![2]));
        assert_eq!(table.column_names(), vec!["chr", "start", "end"]);
        assert!(ArrowTable::from_batches(vec![]).is_err());
    }
}
