use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::duckdb_load::{BatchFilters, ConflictMode};

pub const DEFAULT_CSV_PATH: &str = "golden_globe_awards.csv";
pub const DEFAULT_DATABASE_PATH: &str = "golden_globe_awards.db";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Everything a single load run needs, built once at the entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub csv_path: PathBuf,
    pub database_path: PathBuf,
    pub chunk_size: NonZeroUsize,
    pub clear: bool,
    pub filters: BatchFilters,
    pub on_conflict: ConflictMode,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            chunk_size: NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN),
            clear: false,
            filters: BatchFilters::default(),
            on_conflict: ConflictMode::default(),
        }
    }
}
