use anyhow::{Context, Result};
use clap::Parser;

use dropprune::cli::args::Cli;
use dropprune::cli::output;
use dropprune::common::config::Config;
use dropprune::common::logging;
use dropprune::pruner::Pruner;
use dropprune::storage;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("Cannot start with config {}", cli.config.display()))?;

    logging::init(config.settings.log_file());
    tracing::debug!(
        "{} targets in {} mode",
        config.targets.len(),
        config.settings.mode()
    );

    let storage = storage::open(&config.settings).context("Failed to open Dropbox session")?;

    let report = Pruner::new(storage.as_ref(), &config).run(&config.targets);
    output::print_report(&report);

    Ok(())
}
