use std::path::PathBuf;

/// Error types for prune operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but these typed errors let the pipeline decide what is fatal
/// and what only takes down a single target.
#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    /// Configuration file is missing, unreadable or invalid
    #[error("Config error in '{}': {}", .path.display(), .message)]
    Config { path: PathBuf, message: String },

    /// File system operation failed
    #[error("I/O error at '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured local target directory does not exist
    #[error("path does not exist: '{}'", .path.display())]
    MissingPath { path: PathBuf },

    /// Storage backend rejected a call
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    /// Storage backend answered with something we could not decode
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, PruneError>;

impl PruneError {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PruneError::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PruneError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        PruneError::Api {
            status,
            message: message.into(),
        }
    }
}

impl From<ureq::Error> for PruneError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => PruneError::Api {
                status: Some(code),
                message: format!("HTTP {}", code),
            },
            other => PruneError::Api {
                status: None,
                message: other.to_string(),
            },
        }
    }
}
