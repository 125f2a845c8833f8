//! # DropPrune
//!
//! Keeps backup drop folders from growing without bound.
//!
//! For every configured target (a Dropbox folder or a local directory)
//! DropPrune:
//!
//! - **Matches** file names against a case-insensitive regex
//! - **Ignores** files listed by exact name on the target's ignore list
//! - **Keeps** the N most recently modified matches
//! - **Deletes** the rest, or only reports them in a dry run
//!
//! Meant to run unattended from cron; every line is timestamped and can be
//! mirrored into an append-only log file.

pub mod cli;
pub mod common;
pub mod pruner;
pub mod storage;
