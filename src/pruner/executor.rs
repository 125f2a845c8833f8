use super::stats::Stats;
use crate::common::errors::Result;
use crate::common::format::format_size;
use crate::storage::{FileEntry, Storage};

/// Delete (or, in a dry run, pretend to delete) every file of a delete set.
///
/// Stops at the first backend failure. Files deleted before the failure
/// stay counted in `stats`.
pub fn execute(
    storage: &dyn Storage,
    delete_set: &[FileEntry],
    dry_run: bool,
    stats: &mut Stats,
) -> Result<()> {
    if delete_set.is_empty() {
        return Ok(());
    }

    if dry_run {
        tracing::info!("[DRY RUN] no deletions will occur");
        tracing::info!("Files that WOULD be deleted ({}):", delete_set.len());
    } else {
        tracing::info!("[DELETING] ({}) files:", delete_set.len());
    }

    let before = stats.deleted_bytes;
    for entry in delete_set {
        tracing::info!("  DELETE: {} {}", entry.name, format_size(entry.size));
        if !dry_run {
            storage.delete(entry)?;
        }
        stats.record_deleted(entry.size);
    }

    tracing::info!("  Total: {}", format_size(stats.deleted_bytes - before));
    Ok(())
}
