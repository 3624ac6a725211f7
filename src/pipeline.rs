use tracing::{debug, info};

use crate::config::LoadConfig;
use crate::csv_load::CsvChunkReader;
use crate::duckdb_load::DuckDbWriter;
use crate::error::Result;

/// Run one load: optional clear, then every batch of the source through the writer.
///
/// Batches are committed independently. A batch rejected for duplicates is
/// skipped, and any other error stops the run with earlier batches left in place.
pub fn run(config: &LoadConfig) -> Result<()> {
    let mut writer = DuckDbWriter::open(&config.database_path, config.on_conflict)?;

    // Open the source before clearing so a missing file leaves the table untouched
    let reader = CsvChunkReader::open(&config.csv_path, config.chunk_size)?;
    info!(
        file = %config.csv_path.display(),
        chunk_size = config.chunk_size.get(),
        columns = ?reader.headers(),
        "Opened source file"
    );

    if config.clear {
        writer.clear_all()?;
    }

    for batch in reader {
        let batch = batch?;
        let outcome = writer.write_batch(&batch, &config.filters)?;
        debug!(batch = batch.index(), ?outcome, "Batch done");
    }

    writer.close()
}
