use duckdb::types::Value;
use duckdb::{appender_params_from_iter, Transaction};

use crate::duckdb_load::insert_strategy::InsertStrategy;
use crate::duckdb_load::schema::TableSchema;
use crate::error::Result;

/// Strategy for the native bulk path.
/// DuckDB's appender has no conflict clause, so one duplicate fails the flush
/// and the writer rolls the whole batch back.
pub struct RejectBatchStrategy;

impl InsertStrategy for RejectBatchStrategy {
    fn name(&self) -> &'static str {
        "reject-batch"
    }

    fn insert_rows(
        &self,
        tx: &Transaction<'_>,
        schema: &TableSchema,
        rows: &[Vec<Value>],
    ) -> Result<usize> {
        // Rows are already laid out in table column order
        let mut appender = tx.appender(schema.table_name())?;
        for row in rows {
            appender.append_row(appender_params_from_iter(row.iter()))?;
        }
        appender.flush()?;
        Ok(rows.len())
    }
}
