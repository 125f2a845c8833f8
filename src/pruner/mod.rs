pub mod executor;
pub mod filter;
pub mod ranker;
pub mod stats;

use regex::Regex;
use std::time::Instant;

use crate::common::config::{Config, Settings, TargetConfig};
use crate::common::errors::{PruneError, Result};
use crate::common::format::{format_elapsed, format_modified, format_size};
use crate::storage::Storage;

pub use filter::{classify, Bucket, Matches};
pub use ranker::{rank, Retention};
pub use stats::{RunReport, Stats, TargetSummary};

/// How a target's pipeline ended when nothing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing eligible; only ignored files (if any) were counted
    NoMatches,
    /// Keep and delete sets were processed
    Pruned,
}

/// Runs the retention pipeline over every configured target of a run
pub struct Pruner<'a> {
    storage: &'a dyn Storage,
    settings: &'a Settings,
    pattern: &'a Regex,
    report: RunReport,
}

impl<'a> Pruner<'a> {
    pub fn new(storage: &'a dyn Storage, config: &'a Config) -> Self {
        Self {
            storage,
            settings: &config.settings,
            pattern: &config.pattern,
            report: RunReport::new(storage.mode(), config.settings.dry_run),
        }
    }

    /// Prune each target in order and return the run's report.
    /// A failing target is logged and skipped; it never aborts the run.
    pub fn run(mut self, targets: &[TargetConfig]) -> RunReport {
        let start = Instant::now();
        for target in targets {
            self.prune_target(target);
        }
        self.report.elapsed = start.elapsed();
        self.report
    }

    /// Prune a single target, committing its statistics to the run report
    pub fn prune_target(&mut self, target: &TargetConfig) {
        let start = Instant::now();

        if let Err(e) = self.storage.check(&target.path) {
            match e {
                PruneError::MissingPath { .. } => tracing::warn!(
                    "{}: path does not exist, skipping ({})",
                    target.name,
                    target.path
                ),
                other => tracing::error!("{}: cannot prune {}: {}", target.name, target.path, other),
            }
            return;
        }

        tracing::info!(
            "Scanning {} {} folder: {}",
            self.storage.mode().label(),
            target.name,
            target.path
        );

        let mut stats = Stats::default();
        match self.prune_files(target, &mut stats) {
            Ok(Outcome::NoMatches) => {
                self.report.commit(&target.name, stats, false);
            }
            Ok(Outcome::Pruned) => {
                tracing::info!(
                    "Done pruning {}. Elapsed: {}\n",
                    target.name,
                    format_elapsed(start.elapsed())
                );
                self.report.commit(&target.name, stats, true);
            }
            Err(e) => {
                match e {
                    PruneError::Api { .. } => tracing::error!("API error on {}: {}", target.name, e),
                    _ => tracing::error!("Error pruning {}: {}", target.name, e),
                }
                self.report.commit(&target.name, stats, false);
            }
        }
    }

    /// List, match, rank and delete. `stats` holds whatever was counted
    /// even when this returns an error.
    fn prune_files(&self, target: &TargetConfig, stats: &mut Stats) -> Result<Outcome> {
        let entries = self.storage.list(&target.path)?;
        let matches = classify(entries, self.pattern, &target.ignore);

        for f in &matches.ignored {
            tracing::info!("[IGNORED]: {} {}", f.name, format_size(f.size));
            stats.record_ignored(f.size);
        }
        if stats.ignored_bytes > 0 {
            tracing::info!("  Total: {}", format_size(stats.ignored_bytes));
        }

        if matches.eligible.is_empty() {
            tracing::info!("No matching files found");
            return Ok(Outcome::NoMatches);
        }

        stats.processed = matches.eligible.len() + matches.ignored.len();
        let retention = rank(matches.eligible, target.keep(self.settings));

        tracing::info!("[KEEPING] ({}) newest files:", retention.keep.len());
        for f in &retention.keep {
            stats.record_kept(f.size);
            tracing::info!(
                "  KEEP: {} {} (modified {})",
                f.name,
                format_size(f.size),
                format_modified(&f.modified)
            );
        }
        tracing::info!("  Total: {}", format_size(stats.kept_bytes));

        executor::execute(self.storage, &retention.delete, self.settings.dry_run, stats)?;
        Ok(Outcome::Pruned)
    }
}
