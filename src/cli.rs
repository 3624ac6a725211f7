use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::config::{LoadConfig, DEFAULT_CHUNK_SIZE, DEFAULT_CSV_PATH, DEFAULT_DATABASE_PATH};
use crate::duckdb_load::{BatchFilters, ConflictMode};

/// Load Golden Globe awards records from CSV into DuckDB.
///
/// Example: gg-awards-loader -c --year 1995 -w
#[derive(Parser, Debug)]
#[command(name = "gg-awards-loader")]
#[command(author, version, about)]
pub struct Cli {
    /// Delete all rows of the destination table before loading
    #[arg(short, long)]
    pub clear: bool,

    /// Load only award winners
    #[arg(short, long)]
    pub winner: bool,

    /// Load only records of this ceremony year (YYYY)
    #[arg(short, long, value_name = "YYYY")]
    pub year: Option<i64>,

    /// Source CSV file
    #[arg(short, long, env = "GGA_CSV_PATH", default_value = DEFAULT_CSV_PATH)]
    pub file: PathBuf,

    /// DuckDB database file
    #[arg(short, long, env = "GGA_DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    /// Number of source rows per batch
    #[arg(long, env = "GGA_CHUNK_SIZE", default_value_t = NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN))]
    pub chunk_size: NonZeroUsize,

    /// How rows that collide with existing ones are handled
    #[arg(long, value_enum, default_value_t = ConflictMode::Ignore)]
    pub on_conflict: ConflictMode,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> LoadConfig {
        LoadConfig {
            csv_path: self.file,
            database_path: self.database,
            chunk_size: self.chunk_size,
            clear: self.clear,
            filters: BatchFilters {
                year: self.year,
                winners_only: self.winner,
            },
            on_conflict: self.on_conflict,
        }
    }
}
