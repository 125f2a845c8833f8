use crate::storage::FileEntry;

/// Keep/delete partition of a target's eligible files
#[derive(Debug, Default)]
pub struct Retention {
    /// Newest files, most recent first
    pub keep: Vec<FileEntry>,
    /// Everything older than the keep set, most recent first
    pub delete: Vec<FileEntry>,
}

/// Sort newest first and split after `keep` entries.
///
/// The sort is stable, so files with equal modification times stay in
/// listing order.
pub fn rank(mut eligible: Vec<FileEntry>, keep: usize) -> Retention {
    eligible.sort_by(|a, b| b.modified.cmp(&a.modified));
    let delete = eligible.split_off(keep.min(eligible.len()));
    Retention {
        keep: eligible,
        delete,
    }
}
