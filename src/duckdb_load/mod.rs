pub mod filters;
pub mod ignore_strategy;
pub mod insert_strategy;
pub mod reject_strategy;
pub mod schema;
pub mod writer;

pub use filters::BatchFilters;
pub use insert_strategy::{ConflictMode, InsertStrategy};
pub use schema::{ColumnType, TableSchema};
pub use writer::DuckDbWriter;

// Destination table for award records
pub const TABLE_NAME: &str = "gg_awards";

/// Result of handing one batch to the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No record survived the filters, nothing was written
    Empty,
    /// The batch was committed. `inserted` may be lower than `candidates`
    /// when duplicates were skipped.
    Inserted { candidates: usize, inserted: usize },
    /// A uniqueness violation rolled the whole batch back
    DuplicateRejected { rows: usize },
}
