use duckdb::types::Value;
use duckdb::{params_from_iter, Transaction};

use crate::duckdb_load::insert_strategy::InsertStrategy;
use crate::duckdb_load::schema::TableSchema;
use crate::error::Result;

/// Strategy that lets the uniqueness constraint silently skip duplicates.
///
/// One prepared INSERT OR IGNORE statement is executed per row, all inside the
/// writer's batch transaction, so the batch still commits or rolls back as a unit.
/// A duplicate only drops itself, whether it repeats a committed row or an
/// earlier row of the same batch.
pub struct IgnoreDuplicatesStrategy;

impl IgnoreDuplicatesStrategy {
    fn insert_sql(schema: &TableSchema) -> String {
        let placeholders = vec!["?"; schema.columns().len()].join(", ");
        format!(
            "INSERT OR IGNORE INTO {} ({}) VALUES ({});",
            schema.quoted_table(),
            schema.quoted_columns(),
            placeholders
        )
    }
}

impl InsertStrategy for IgnoreDuplicatesStrategy {
    fn name(&self) -> &'static str {
        "ignore"
    }

    fn insert_rows(
        &self,
        tx: &Transaction<'_>,
        schema: &TableSchema,
        rows: &[Vec<Value>],
    ) -> Result<usize> {
        let mut stmt = tx.prepare(&Self::insert_sql(schema))?;
        let mut inserted = 0;
        for row in rows {
            inserted += stmt.execute(params_from_iter(row.iter()))?;
        }
        Ok(inserted)
    }
}
