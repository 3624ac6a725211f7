use thiserror::Error;

/// Errors raised while reading the source file or writing to DuckDB.
///
/// Duplicate rows are not errors here: a rejected batch is reported through
/// [`crate::duckdb_load::WriteOutcome::DuplicateRejected`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open database '{path}': {source}")]
    Connection {
        path: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("failed to read source file: {0}")]
    Source(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("table reported a row count of {0}")]
    RowCount(i64),

    #[error("column '{0}' is required by the active filters but missing from the source header")]
    MissingColumn(String),

    #[error("source column '{column}' does not exist in table '{table}'")]
    UnknownColumn { column: String, table: String },

    #[error("value '{value}' in column '{column}' is not a valid {expected}")]
    InvalidValue {
        column: String,
        value: String,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;
