use crate::error::Result;
use crate::importer::{ArrowTable, Importer};
use arrow::record_batch::RecordBatch;
use duckdb::Connection;
use polars::prelude::{IntoLazy, LazyFrame};
use tracing::debug;

/// A DuckDB query whose result has not been fetched yet.
///
/// The query is prepared once on construction, so syntax errors and unknown
/// tables are reported right away. Execution happens when the result is
/// converted. The [QueryResult] owns a clone of the caller's connection that
/// shares the same database, so it outlives the borrow it was built from.
///
/// ### Example
///
/// ```rust
/// use duckdb::Connection;
/// use duckranges::importer::QueryResult;
///
/// let conn = Connection::open_in_memory()?;
/// let query = QueryResult::new(&conn, "SELECT 'chr1' AS chr, 1 AS start, 10 AS \"end\"")?;
/// assert_eq!(query.to_arrow()?.num_rows(), 1);
/// # Ok::<(), duckranges::DuckRangesError>(())
/// ```
#[derive(Debug)]
pub struct QueryResult {
    conn: Connection,
    sql: String,
}

impl QueryResult {
    pub fn new<S: Into<String>>(conn: &Connection, sql: S) -> Result<QueryResult> {
        let sql = sql.into();
        conn.prepare(&sql)?;
        Ok(QueryResult {
            conn: conn.try_clone()?,
            sql,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Runs the query and collects the result as an [ArrowTable].
    pub fn to_arrow(&self) -> Result<ArrowTable> {
        debug!("running query: {}", self.sql());
        let mut stmt = self.conn.prepare(&self.sql)?;
        let arrow = stmt.query_arrow([])?;
        let schema = arrow.get_schema();
        let batches: Vec<RecordBatch> = arrow.collect();
        debug!(
            "query returned {} record batches with columns {:?}",
            batches.len(),
            schema.fields().iter().map(|f| f.name()).collect::<Vec<_>>()
        );
        ArrowTable::try_new(schema, batches)
    }
}

/// Imports a [QueryResult] by materialising it into Arrow and then into Polars.
pub struct DuckDBImporter {
    query: QueryResult,
}

impl DuckDBImporter {
    pub fn new(query: QueryResult) -> DuckDBImporter {
        DuckDBImporter { query }
    }
}

impl Importer for DuckDBImporter {
    fn to_lazy_frame(&self) -> Result<LazyFrame> {
        let table = self.query.to_arrow()?;
        Ok(table.to_dataframe()?.lazy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DuckRangesError;

    fn toy_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE peaks (chr VARCHAR, start BIGINT, \"end\" BIGINT, score DOUBLE);
             INSERT INTO peaks VALUES ('chr1', 1, 10, 0.5), ('chr1', 20, 30, 1.5), ('chr2', 5, 8, 2.5);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_query_to_lazy_frame() -> anyhow::Result<()> {
        let conn = toy_connection();
        let query = QueryResult::new(&conn, "SELECT * FROM peaks ORDER BY chr, start")?;
        let df = DuckDBImporter::new(query).to_lazy_frame()?.collect()?;
        assert_eq!(df.height(), 3);
        assert_eq!(df.get_column_names(), vec!["chr", "start", "end", "score"]);
        Ok(())
    }

    #[test]
    fn test_query_sees_later_writes() -> anyhow::Result<()> {
        let conn = toy_connection();
        let query = QueryResult::new(&conn, "SELECT * FROM peaks")?;
        conn.execute_batch("INSERT INTO peaks VALUES ('chr3', 1, 2, 0.0);")?;
        assert_eq!(query.to_arrow()?.num_rows(), 4);
        Ok(())
    }

    #[test]
    fn test_struct_columns_survive_import() -> anyhow::Result<()> {
        let conn = toy_connection();
        let sql = "SELECT chr, start, \"end\", {'score': score, 'kept': true} AS info FROM peaks";
        let query = QueryResult::new(&conn, sql)?;
        assert_eq!(query.sql(), sql);
        let df = DuckDBImporter::new(query).to_lazy_frame()?.collect()?;
        assert_eq!(df.height(), 3);
        assert!(matches!(
            df.column("info")?.dtype(),
            polars::prelude::DataType::Struct(_)
        ));
        Ok(())
    }

    #[test]
    fn test_bad_sql_fails_on_construction() {
        let conn = toy_connection();
        let err = QueryResult::new(&conn, "SELECT * FROM no_such_table").unwrap_err();
        assert!(matches!(err, DuckRangesError::DuckDb(_)));
    }
}
