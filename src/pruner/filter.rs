use regex::Regex;
use std::collections::HashSet;

use crate::storage::FileEntry;

/// Where a listed file ends up after pattern + ignore-list matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Name does not match the pattern; dropped without a trace
    Skip,
    /// Matches, but is on the ignore list
    Ignored,
    /// Matches and competes for a keep slot
    Eligible,
}

/// Matched files of one listing, in listing order
#[derive(Debug, Default)]
pub struct Matches {
    pub ignored: Vec<FileEntry>,
    pub eligible: Vec<FileEntry>,
}

/// Classify a single file name.
/// Ignore-list lookups are exact: no case folding, no path normalization.
pub fn bucket_for(name: &str, pattern: &Regex, ignore: &HashSet<String>) -> Bucket {
    if !pattern.is_match(name) {
        Bucket::Skip
    } else if ignore.contains(name) {
        Bucket::Ignored
    } else {
        Bucket::Eligible
    }
}

/// Split a listing into ignored and eligible matches
pub fn classify(entries: Vec<FileEntry>, pattern: &Regex, ignore: &HashSet<String>) -> Matches {
    let mut matches = Matches::default();
    for entry in entries {
        match bucket_for(&entry.name, pattern, ignore) {
            Bucket::Skip => {}
            Bucket::Ignored => matches.ignored.push(entry),
            Bucket::Eligible => matches.eligible.push(entry),
        }
    }
    matches
}
