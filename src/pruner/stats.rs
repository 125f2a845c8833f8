use std::time::Duration;

use crate::common::config::Mode;

/// Counters for one target, or summed over a whole run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Matched files (eligible + ignored) of targets that got past matching
    pub processed: usize,
    pub kept: usize,
    pub deleted: usize,
    pub ignored: usize,
    pub kept_bytes: u64,
    pub deleted_bytes: u64,
    pub ignored_bytes: u64,
}

impl Stats {
    pub fn record_ignored(&mut self, size: u64) {
        self.ignored += 1;
        self.ignored_bytes += size;
    }

    pub fn record_kept(&mut self, size: u64) {
        self.kept += 1;
        self.kept_bytes += size;
    }

    /// Counted for real and simulated deletions alike
    pub fn record_deleted(&mut self, size: u64) {
        self.deleted += 1;
        self.deleted_bytes += size;
    }

    pub fn processed_bytes(&self) -> u64 {
        self.kept_bytes + self.deleted_bytes + self.ignored_bytes
    }

    /// Add another scope's counters into this one
    pub fn merge(&mut self, other: &Stats) {
        self.processed += other.processed;
        self.kept += other.kept;
        self.deleted += other.deleted;
        self.ignored += other.ignored;
        self.kept_bytes += other.kept_bytes;
        self.deleted_bytes += other.deleted_bytes;
        self.ignored_bytes += other.ignored_bytes;
    }
}

/// Final counters of a target that ran to completion
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSummary {
    pub name: String,
    pub stats: Stats,
}

/// Everything the end-of-run report shows
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: Mode,
    pub dry_run: bool,
    pub elapsed: Duration,
    pub totals: Stats,
    /// One entry per completed target, in processing order
    pub targets: Vec<TargetSummary>,
}

impl RunReport {
    pub fn new(mode: Mode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            elapsed: Duration::ZERO,
            totals: Stats::default(),
            targets: Vec::new(),
        }
    }

    /// Fold one target's counters into the run totals.
    /// Only targets that ran to completion get a summary line.
    pub fn commit(&mut self, name: &str, stats: Stats, completed: bool) {
        self.totals.merge(&stats);
        if completed {
            self.targets.push(TargetSummary {
                name: name.to_string(),
                stats,
            });
        }
    }
}
