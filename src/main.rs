use anyhow::{Context, Result};
use clap::Parser;
use gg_awards_loader::cli::Cli;
use gg_awards_loader::logging::init_logging;
use gg_awards_loader::pipeline;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let config = cli.into_config();

    info!("Starting Golden Globe awards loader...");

    pipeline::run(&config).with_context(|| {
        format!(
            "failed to load '{}' into '{}'",
            config.csv_path.display(),
            config.database_path.display()
        )
    })?;

    info!("Golden Globe awards loader finished.");
    Ok(())
}
