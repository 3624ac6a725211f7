use duckdb::types::Value;
use duckdb::Transaction;

use crate::duckdb_load::ignore_strategy::IgnoreDuplicatesStrategy;
use crate::duckdb_load::reject_strategy::RejectBatchStrategy;
use crate::duckdb_load::schema::TableSchema;
use crate::error::Result;

/// Strategy trait for getting a prepared batch into the destination table.
/// Both strategies run inside the per-batch transaction owned by the writer.
pub trait InsertStrategy {
    fn name(&self) -> &'static str;

    /// Insert the rows and return how many were actually stored
    fn insert_rows(
        &self,
        tx: &Transaction<'_>,
        schema: &TableSchema,
        rows: &[Vec<Value>],
    ) -> Result<usize>;
}

// How rows that collide with the uniqueness constraint are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ConflictMode {
    /// Drop colliding rows one by one and keep the rest of the batch
    #[default]
    Ignore,
    /// Reject the whole batch when any row collides
    RejectBatch,
}

impl ConflictMode {
    pub fn strategy(self) -> Box<dyn InsertStrategy> {
        match self {
            ConflictMode::Ignore => Box::new(IgnoreDuplicatesStrategy),
            ConflictMode::RejectBatch => Box::new(RejectBatchStrategy),
        }
    }
}
