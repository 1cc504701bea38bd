//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/gypr/config.json`.
//! Every key is optional; a minimal `{}` file is valid and all sections fall
//! back to their compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "focus_tracking": "snapshot",
//!   "hyprctl": { "program": "hyprctl", "format": "json" },
//!   "notifications": {
//!     "enabled": true,
//!     "program": "notify-send",
//!     "app_name": "gypr",
//!     "expire_ms": 1500
//!   }
//! }
//! ```

use crate::snapshot::QueryFormat;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// How `focusedmon` events are turned into a position.
    #[serde(default)]
    pub focus_tracking: FocusTracking,

    /// Control-surface query settings.
    #[serde(default)]
    pub hyprctl: HyprctlConfig,

    /// Desktop notification settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Source of truth for the position reported when a monitor gains focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusTracking {
    /// Use the workspaces seen on the event stream.
    #[default]
    Registry,
    /// Query a fresh snapshot from `hyprctl` for every focus change.
    Snapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HyprctlConfig {
    /// Program to run.  Default: `"hyprctl"`.
    pub program: String,
    /// Output format of the workspaces query.  Default: `"text"`.
    pub format: QueryFormat,
}

impl Default for HyprctlConfig {
    fn default() -> Self {
        Self {
            program: "hyprctl".into(),
            format: QueryFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// When `false`, notifications are only logged.  Default: `true`.
    pub enabled: bool,
    /// Program to run.  Default: `"notify-send"`.
    pub program: String,
    /// Passed as `-a`.  Default: `"gypr"`.
    pub app_name: Option<String>,
    /// Passed as `-t` (milliseconds).  Default: unset, the server decides.
    pub expire_ms: Option<u32>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "notify-send".into(),
            app_name: Some("gypr".into()),
            expire_ms: None,
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/gypr/config.json`, or `~/.config/gypr/config.json`.
    pub fn default_path() -> PathBuf {
        let base = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::from(std::env::var_os("HOME").unwrap_or_else(|| "/tmp".into()))
                .join(".config"),
        };
        base.join("gypr").join("config.json")
    }

    /// Read the JSON config at `path`.
    ///
    /// A missing file is `Ok(None)`; an unreadable or invalid one is an error.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Why a config file present on disk could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
