use duckdb::Connection;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::csv_load::Batch;
use crate::duckdb_load::filters::BatchFilters;
use crate::duckdb_load::insert_strategy::{ConflictMode, InsertStrategy};
use crate::duckdb_load::schema::{quote_ident, TableSchema};
use crate::duckdb_load::{WriteOutcome, TABLE_NAME};
use crate::error::{LoadError, Result};

// Writer that owns the DuckDB connection for the whole run
// Each batch is filtered, normalized and inserted inside its own transaction
pub struct DuckDbWriter {
    conn: Connection,
    table_name: String,
    schema: Option<TableSchema>,
    strategy: Box<dyn InsertStrategy>,
}

impl DuckDbWriter {
    // Open (or create) the database file
    pub fn open<P: AsRef<Path>>(path: P, mode: ConflictMode) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| LoadError::Connection {
            path: path.display().to_string(),
            source,
        })?;
        info!(database = %path.display(), "Opened database");
        Self::with_connection(conn, mode)
    }

    pub fn open_in_memory(mode: ConflictMode) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| LoadError::Connection {
            path: ":memory:".to_string(),
            source,
        })?;
        Self::with_connection(conn, mode)
    }

    fn with_connection(conn: Connection, mode: ConflictMode) -> Result<Self> {
        let schema = TableSchema::load(&conn, TABLE_NAME)?;
        if let Some(schema) = &schema {
            debug!(table = TABLE_NAME, columns = schema.columns().len(), "Found existing table");
        }

        let strategy = mode.strategy();
        debug!(strategy = strategy.name(), "Selected insert strategy");

        Ok(Self {
            conn,
            table_name: TABLE_NAME.to_string(),
            schema,
            strategy,
        })
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| LoadError::Database(e))?;
        debug!("Closed database connection");
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // Delete every row of the destination table, keeping the table itself
    pub fn clear_all(&mut self) -> Result<usize> {
        if self.schema.is_none() {
            info!(table = %self.table_name, "Table does not exist yet, nothing to clear");
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        let deleted = tx.execute(&format!("DELETE FROM {};", quote_ident(&self.table_name)), [])?;
        tx.commit()?;

        info!(table = %self.table_name, deleted, "All table rows deleted");
        Ok(deleted)
    }

    pub fn row_count(&self) -> Result<usize> {
        if self.schema.is_none() {
            return Ok(0);
        }
        let query = format!("SELECT COUNT(*) FROM {};", quote_ident(&self.table_name));
        let count: i64 = self.conn.query_row(&query, [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| LoadError::RowCount(count))
    }

    /// Filter a batch and append what survives to the destination table.
    ///
    /// A uniqueness violation rolls back this batch only and is reported as
    /// [`WriteOutcome::DuplicateRejected`]. Every other failure is returned as an error.
    pub fn write_batch(&mut self, batch: &Batch, filters: &BatchFilters) -> Result<WriteOutcome> {
        let kept = filters.select(batch)?;
        info!(
            batch = batch.index(),
            size = batch.len(),
            kept = kept.len(),
            year = ?filters.year,
            winners_only = filters.winners_only,
            "Processing batch"
        );

        if kept.is_empty() {
            info!(batch = batch.index(), "Batch contains no matching records");
            return Ok(WriteOutcome::Empty);
        }

        for record in &kept {
            debug!(batch = batch.index(), fields = ?record.fields(), "Record");
        }

        let schema = match self.schema.take() {
            Some(schema) => schema,
            None => self.create_table(batch)?,
        };
        let rows = schema.prepare_rows(batch.headers(), &kept);
        let schema = self.schema.insert(schema);
        let rows = rows?;

        // Dropping an uncommitted transaction rolls it back
        let tx = self.conn.transaction()?;
        let written = self
            .strategy
            .insert_rows(&tx, schema, &rows)
            .and_then(|inserted| {
                tx.commit()?;
                Ok(inserted)
            });

        match written {
            Ok(inserted) => {
                info!(
                    batch = batch.index(),
                    inserted,
                    skipped = rows.len() - inserted.min(rows.len()),
                    "Batch written"
                );
                Ok(WriteOutcome::Inserted {
                    candidates: rows.len(),
                    inserted,
                })
            }
            Err(LoadError::Database(e)) if is_unique_violation(&e) => {
                warn!(batch = batch.index(), rows = rows.len(), error = %e, "Batch rejected by uniqueness constraint");
                Ok(WriteOutcome::DuplicateRejected { rows: rows.len() })
            }
            Err(e) => Err(e),
        }
    }

    fn create_table(&self, batch: &Batch) -> Result<TableSchema> {
        let schema = TableSchema::from_headers(&self.table_name, batch.headers());
        self.conn.execute_batch(&schema.create_table_sql())?;
        info!(table = %self.table_name, columns = ?schema.columns(), "Created table");
        Ok(schema)
    }
}

// DuckDB only exposes constraint failures through the "Constraint Error" message class.
// The full-row UNIQUE is the table's only constraint, so any such error is a duplicate
fn is_unique_violation(err: &duckdb::Error) -> bool {
    err.to_string().contains("Constraint Error")
}
