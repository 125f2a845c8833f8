pub mod dropbox;
pub mod local;

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::common::config::{Mode, Settings};
use crate::common::errors::Result;

pub use dropbox::DropboxStorage;
pub use local::LocalStorage;

// ─── Core types ───────────────────────────────────────────────────────────────

/// Backend reference used to delete a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileHandle {
    /// Filesystem path of a local file
    Local(PathBuf),
    /// Backend path of a remote file (Dropbox `path_lower`)
    Remote(String),
}

/// One file reported by a storage listing
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// File name as reported by the backend
    pub name: String,
    pub size: u64,
    /// Backend clock; only used for relative ordering
    pub modified: DateTime<Utc>,
    pub handle: FileHandle,
}

/// A place files can be listed from and deleted in.
///
/// The prune pipeline only talks to this trait; the backend is picked once
/// at startup from the run's mode.
pub trait Storage {
    /// Which backend this is
    fn mode(&self) -> Mode;

    /// Check that a target location can be pruned at all.
    /// Backends that cannot tell up front accept every location.
    fn check(&self, _location: &str) -> Result<()> {
        Ok(())
    }

    /// All files directly inside `location`, in listing order.
    /// Paginated backends drain every page before returning.
    fn list(&self, location: &str) -> Result<Vec<FileEntry>>;

    /// Permanently delete one file
    fn delete(&self, entry: &FileEntry) -> Result<()>;
}

/// Open the backend selected by the run's settings
pub fn open(settings: &Settings) -> Result<Box<dyn Storage>> {
    match settings.mode() {
        Mode::Local => Ok(Box::new(LocalStorage::new())),
        Mode::Dropbox => {
            let storage = DropboxStorage::connect(
                settings.app_key.as_deref().unwrap_or_default(),
                settings.app_secret.as_deref().unwrap_or_default(),
                settings.refresh_token.as_deref().unwrap_or_default(),
            )?;
            Ok(Box::new(storage))
        }
    }
}
