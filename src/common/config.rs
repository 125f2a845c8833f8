use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

use super::errors::{PruneError, Result};

/// Name of the table holding run-wide settings
pub const SETTINGS_TABLE: &str = "settings";

/// Retention count used when neither the target nor the settings give one
pub const FALLBACK_KEEP: usize = 1;

/// The `[settings]` table
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Dropbox app key (remote mode only)
    #[serde(default)]
    pub app_key: Option<String>,

    /// Dropbox app secret (remote mode only)
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Long-lived OAuth2 refresh token (remote mode only)
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// File name pattern, case-insensitive, verbose syntax
    pub regex_pattern: String,

    /// Prune local directories instead of Dropbox folders
    #[serde(default)]
    pub local: bool,

    /// Fallback retention count for targets without `keep`
    #[serde(default, deserialize_with = "lenient_count")]
    pub default_keep: Option<usize>,

    /// Report what would be deleted without deleting anything
    pub dry_run: bool,

    /// Mirror console output into `log_file`
    #[serde(default)]
    pub enable_logging: bool,

    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Which storage backend all targets of a run live on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dropbox,
    Local,
}

impl Mode {
    /// Key that marks a table as a prune target in this mode
    pub fn path_key(&self) -> &'static str {
        match self {
            Mode::Dropbox => "path_dropbox",
            Mode::Local => "path_local",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Dropbox => "DropBox",
            Mode::Local => "Local",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Settings {
    pub fn mode(&self) -> Mode {
        if self.local {
            Mode::Local
        } else {
            Mode::Dropbox
        }
    }

    /// Compile `regex_pattern` the way it is matched against file names
    pub fn pattern(&self) -> std::result::Result<Regex, regex::Error> {
        RegexBuilder::new(&self.regex_pattern)
            .case_insensitive(true)
            .ignore_whitespace(true)
            .build()
    }

    /// Log file to append to, if logging is enabled and a file is set
    pub fn log_file(&self) -> Option<&Path> {
        if !self.enable_logging {
            return None;
        }
        self.log_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// One configured prune target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetConfig {
    /// Display name; defaults to the dotted section path
    pub name: String,
    /// Dropbox folder or local directory, depending on the run's mode
    pub path: String,
    /// Per-target retention count
    pub keep: Option<usize>,
    /// Exact file names that are never kept or deleted
    pub ignore: HashSet<String>,
}

/// Target fields besides the mode-specific path key
#[derive(Debug, Deserialize)]
struct TargetFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    keep: Option<usize>,
    #[serde(default)]
    ignore: Vec<String>,
}

impl TargetConfig {
    /// Resolved retention count for this target
    pub fn keep(&self, settings: &Settings) -> usize {
        resolve_keep(self.keep, settings.default_keep)
    }

    fn from_table(section: &str, table: &Table, mode: Mode) -> std::result::Result<Self, String> {
        let key = mode.path_key();
        let path = table
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| format!("[{}] `{}` must be a string", section, key))?;

        let fields: TargetFields = Value::Table(table.clone())
            .try_into()
            .map_err(|e| format!("[{}] {}", section, e))?;

        let path = match mode {
            Mode::Local => expand_home(path),
            Mode::Dropbox => path.to_string(),
        };

        Ok(TargetConfig {
            name: fields.name.unwrap_or_else(|| section.to_string()),
            path,
            keep: fields.keep,
            ignore: fields.ignore.into_iter().collect(),
        })
    }
}

/// Fallback chain for the retention count: target, then settings, then 1.
/// Zero and negative values count as not configured.
pub fn resolve_keep(target: Option<usize>, default: Option<usize>) -> usize {
    target
        .filter(|k| *k > 0)
        .or(default.filter(|k| *k > 0))
        .unwrap_or(FALLBACK_KEEP)
}

/// Fully loaded and validated configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub settings: Settings,
    pub pattern: Regex,
    pub targets: Vec<TargetConfig>,
}

impl Config {
    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PruneError::config(path, format!("failed to read: {}", e)))?;
        Self::parse(path, &contents)
    }

    /// Parse config text; `path` is only used for error messages
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let doc: Table = toml::from_str(contents)
            .map_err(|e| PruneError::config(path, format!("failed to parse: {}", e)))?;

        let settings: Settings = doc
            .get(SETTINGS_TABLE)
            .cloned()
            .ok_or_else(|| PruneError::config(path, "missing [settings] table"))?
            .try_into()
            .map_err(|e| PruneError::config(path, format!("[settings] {}", e)))?;

        let pattern = settings
            .pattern()
            .map_err(|e| PruneError::config(path, format!("invalid regex_pattern: {}", e)))?;

        let targets = discover_targets(&doc, settings.mode())
            .map_err(|message| PruneError::config(path, message))?;

        let config = Config {
            path: path.to_path_buf(),
            settings,
            pattern,
            targets,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let s = &self.settings;

        if s.mode() == Mode::Dropbox {
            let missing: Vec<&str> = [
                ("app_key", &s.app_key),
                ("app_secret", &s.app_secret),
                ("refresh_token", &s.refresh_token),
            ]
            .iter()
            .filter(|(_, v)| v.as_deref().map_or(true, str::is_empty))
            .map(|(k, _)| *k)
            .collect();

            if !missing.is_empty() {
                return Err(PruneError::config(
                    &self.path,
                    format!("Dropbox mode requires {}", missing.join(", ")),
                ));
            }
        }

        if s.enable_logging && s.log_file().is_none() {
            return Err(PruneError::config(
                &self.path,
                "enable_logging is set but log_file is empty",
            ));
        }

        Ok(())
    }
}

/// Recursively find every table that defines a target for `mode`.
///
/// Walks all top-level tables except `[settings]`, in document order.
/// A table holding the mode's path key is a target and is not descended
/// into; any other table is searched for nested targets.
pub fn discover_targets(doc: &Table, mode: Mode) -> std::result::Result<Vec<TargetConfig>, String> {
    let mut targets = Vec::new();
    for (key, value) in doc {
        if key == SETTINGS_TABLE {
            continue;
        }
        visit(key, value, mode, &mut targets)?;
    }
    Ok(targets)
}

fn visit(
    section: &str,
    value: &Value,
    mode: Mode,
    out: &mut Vec<TargetConfig>,
) -> std::result::Result<(), String> {
    let Value::Table(table) = value else {
        return Ok(());
    };

    if table.contains_key(mode.path_key()) {
        out.push(TargetConfig::from_table(section, table, mode)?);
        return Ok(());
    }

    for (key, child) in table {
        visit(&format!("{}.{}", section, key), child, mode, out)?;
    }
    Ok(())
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{}", home.display(), rest);
        }
    }
    path.to_string()
}

/// Accept any TOML value for a count; only positive integers survive
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_integer)
        .filter(|n| *n > 0)
        .map(|n| n as usize))
}
