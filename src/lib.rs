//! Chunked loader for Golden Globe awards CSV data.
//!
//! The source file is read in fixed-size batches ([`csv_load`]). Each batch is
//! filtered, normalized and appended to a DuckDB table whose UNIQUE constraint
//! keeps duplicate records out ([`duckdb_load`]).

pub mod cli;
pub mod config;
pub mod csv_load;
pub mod duckdb_load;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::LoadConfig;
pub use error::{LoadError, Result};
