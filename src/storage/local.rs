use chrono::{DateTime, Utc};
use std::path::Path;
use walkdir::WalkDir;

use super::{FileEntry, FileHandle, Storage};
use crate::common::config::Mode;
use crate::common::errors::{PruneError, Result};

/// Prunes directories on the local filesystem
#[derive(Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        LocalStorage
    }
}

impl Storage for LocalStorage {
    fn mode(&self) -> Mode {
        Mode::Local
    }

    fn check(&self, location: &str) -> Result<()> {
        let path = Path::new(location);
        if path.exists() {
            Ok(())
        } else {
            Err(PruneError::MissingPath {
                path: path.to_path_buf(),
            })
        }
    }

    fn list(&self, location: &str) -> Result<Vec<FileEntry>> {
        let root = Path::new(location);
        let mut entries = Vec::new();

        // Direct children only; symlinks to files count as files
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        for entry in walker {
            let entry = entry.map_err(|e| PruneError::io(root, e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let metadata = entry
                .metadata()
                .map_err(|e| PruneError::io(path, e.into()))?;
            let modified = metadata
                .modified()
                .map_err(|e| PruneError::io(path, e))?;

            entries.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: DateTime::<Utc>::from(modified),
                handle: FileHandle::Local(path.to_path_buf()),
            });
        }

        tracing::debug!("listed {} files in {}", entries.len(), root.display());
        Ok(entries)
    }

    fn delete(&self, entry: &FileEntry) -> Result<()> {
        match &entry.handle {
            FileHandle::Local(path) => {
                std::fs::remove_file(path).map_err(|e| PruneError::io(path, e))
            }
            FileHandle::Remote(p) => Err(PruneError::api(
                None,
                format!("'{}' is not a local file", p),
            )),
        }
    }
}
