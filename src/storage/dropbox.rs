//! Dropbox API v2 backend.
//!
//! Talks to the HTTP RPC endpoints directly with a blocking `ureq` agent.
//! A short-lived access token is obtained from the configured refresh token
//! once per run and reused for every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use ureq::Agent;

use super::{FileEntry, FileHandle, Storage};
use crate::common::config::Mode;
use crate::common::errors::{PruneError, Result};

/// Default RPC endpoint host
pub const API_BASE: &str = "https://api.dropboxapi.com";

/// Dropbox storage backend.
pub struct DropboxStorage {
    agent: Agent,
    api_base: String,
    bearer: String,
}

impl DropboxStorage {
    /// Exchange a refresh token for an access token and open a session
    pub fn connect(app_key: &str, app_secret: &str, refresh_token: &str) -> Result<Self> {
        Self::connect_with_api_base(API_BASE, app_key, app_secret, refresh_token)
    }

    pub fn connect_with_api_base(
        api_base: &str,
        app_key: &str,
        app_secret: &str,
        refresh_token: &str,
    ) -> Result<Self> {
        let agent = new_agent();
        let url = format!("{}/oauth2/token", api_base);

        let mut response = agent.post(&url).send_form([
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", app_key),
            ("client_secret", app_secret),
        ])?;
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let token: TokenResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| PruneError::InvalidResponse(e.to_string()))?;
        tracing::debug!("obtained Dropbox access token");

        Ok(Self::with_api_base(api_base, token.access_token))
    }

    /// Build a session from an existing access token (for testing or proxies)
    pub fn with_api_base(api_base: impl Into<String>, access_token: impl AsRef<str>) -> Self {
        Self {
            agent: new_agent(),
            api_base: api_base.into(),
            bearer: format!("Bearer {}", access_token.as_ref()),
        }
    }

    /// POST a JSON body to an RPC endpoint and decode the JSON reply
    fn rpc<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/2/{}", self.api_base, endpoint);
        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", self.bearer.as_str())
            .send_json(body)?;

        let status = response.status().as_u16();
        if status >= 400 {
            let text = response.body_mut().read_to_string().unwrap_or_default();
            return Err(api_error(status, &text));
        }

        response
            .body_mut()
            .read_json()
            .map_err(|e| PruneError::InvalidResponse(e.to_string()))
    }

    fn list_folder(&self, path: &str) -> Result<ListFolderPage> {
        self.rpc("files/list_folder", &json!({ "path": api_path(path) }))
    }

    fn list_folder_continue(&self, cursor: &str) -> Result<ListFolderPage> {
        self.rpc("files/list_folder/continue", &json!({ "cursor": cursor }))
    }
}

impl Storage for DropboxStorage {
    fn mode(&self) -> Mode {
        Mode::Dropbox
    }

    fn list(&self, location: &str) -> Result<Vec<FileEntry>> {
        let first = self.list_folder(location)?;
        drain_pages(first, |cursor| self.list_folder_continue(cursor))
    }

    fn delete(&self, entry: &FileEntry) -> Result<()> {
        let path = match &entry.handle {
            FileHandle::Remote(p) => p,
            FileHandle::Local(p) => {
                return Err(PruneError::api(
                    None,
                    format!("'{}' is not a Dropbox file", p.display()),
                ))
            }
        };
        let _: serde_json::Value = self.rpc("files/delete_v2", &json!({ "path": path }))?;
        Ok(())
    }
}

/// Collect the files of a listing, following cursors until `has_more` is false
pub fn drain_pages<F>(first: ListFolderPage, mut next: F) -> Result<Vec<FileEntry>>
where
    F: FnMut(&str) -> Result<ListFolderPage>,
{
    let mut files = Vec::new();
    let mut page = first;
    let mut pages = 1usize;

    loop {
        files.extend(page.entries.into_iter().filter_map(Metadata::into_file_entry));
        if !page.has_more {
            break;
        }
        page = next(&page.cursor)?;
        pages += 1;
    }

    tracing::debug!("listed {} files over {} pages", files.len(), pages);
    Ok(files)
}

/// The API addresses the root folder as "", not "/"
fn api_path(path: &str) -> &str {
    if path == "/" {
        ""
    } else {
        path
    }
}

fn new_agent() -> Agent {
    // Error statuses are decoded by hand so the API's error_summary survives
    Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into()
}

fn api_error(status: u16, body: &str) -> PruneError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.error_summary)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if message.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, message)
    };
    PruneError::api(Some(status), message)
}

// =============================================================================
// API response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_summary: String,
}

/// One page of `files/list_folder` results
#[derive(Debug, Deserialize)]
pub struct ListFolderPage {
    pub entries: Vec<Metadata>,
    pub cursor: String,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum Metadata {
    File(FileMetadata),
    /// Folders and deleted entries are never pruned
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    pub path_lower: String,
    pub size: u64,
    pub server_modified: DateTime<Utc>,
}

impl Metadata {
    fn into_file_entry(self) -> Option<FileEntry> {
        match self {
            Metadata::File(f) => Some(FileEntry {
                name: f.name,
                size: f.size,
                modified: f.server_modified,
                handle: FileHandle::Remote(f.path_lower),
            }),
            Metadata::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: &str) -> ListFolderPage {
        serde_json::from_str(json).unwrap()
    }

    const FIRST_PAGE: &str = r#"{
        "entries": [
            {".tag": "file", "name": "Backup_1.zip", "path_lower": "/backups/backup_1.zip",
             "path_display": "/Backups/Backup_1.zip", "id": "id:a",
             "client_modified": "2024-01-01T00:00:00Z",
             "server_modified": "2024-01-01T03:00:00Z", "rev": "1", "size": 2048},
            {".tag": "folder", "name": "old", "path_lower": "/backups/old", "id": "id:b"}
        ],
        "cursor": "c1",
        "has_more": true
    }"#;

    const LAST_PAGE: &str = r#"{
        "entries": [
            {".tag": "file", "name": "backup_2.zip", "path_lower": "/backups/backup_2.zip",
             "server_modified": "2024-01-02T03:00:00Z", "size": 4096},
            {".tag": "deleted", "name": "gone.zip", "path_lower": "/backups/gone.zip"}
        ],
        "cursor": "c2",
        "has_more": false
    }"#;

    #[test]
    fn test_drain_pages_follows_cursor() {
        let mut cursors = Vec::new();
        let files = drain_pages(page(FIRST_PAGE), |cursor| {
            cursors.push(cursor.to_string());
            Ok(page(LAST_PAGE))
        })
        .unwrap();

        assert_eq!(cursors, vec!["c1"]);
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Backup_1.zip", "backup_2.zip"]);
        assert_eq!(files[0].size, 2048);
        assert_eq!(
            files[0].handle,
            FileHandle::Remote("/backups/backup_1.zip".to_string())
        );
        assert!(files[1].modified > files[0].modified);
    }

    #[test]
    fn test_drain_pages_propagates_continue_error() {
        let result = drain_pages(page(FIRST_PAGE), |_| {
            Err(PruneError::api(Some(409), "reset"))
        });
        assert!(matches!(result, Err(PruneError::Api { status: Some(409), .. })));
    }

    #[test]
    fn test_api_error_uses_summary() {
        let err = api_error(409, r#"{"error_summary": "path/not_found/..", "error": {}}"#);
        assert_eq!(err.to_string(), "HTTP 409: path/not_found/..");

        let err = api_error(500, "");
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn test_root_path() {
        assert_eq!(api_path("/"), "");
        assert_eq!(api_path("/Backups"), "/Backups");
    }
}
