//! Configuration loading and management
//!
//! Handles parsing of `.taskflow.toml` configuration files. Every field has a
//! default, so a missing or empty file is always valid.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::view::{SortKey, StatusFilter};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".taskflow.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the JSON file store lives; defaults to the platform data dir
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// View defaults
    #[serde(default)]
    pub view: ViewConfig,
}

/// Default view parameters applied at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Default sort key: order, priority, due, or title
    #[serde(default = "default_sort")]
    pub default_sort: String,

    /// Default status filter: all, active, completed, or high
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

fn default_sort() -> String {
    "order".to_string()
}

fn default_filter() -> String {
    "all".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            default_filter: default_filter(),
        }
    }
}

impl Config {
    /// Load configuration from `dir/.taskflow.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the store directory: explicit config wins, otherwise the
    /// platform data directory, otherwise `.taskflow` under the working
    /// directory.
    pub fn resolve_store_dir(&self) -> PathBuf {
        if let Some(dir) = &self.store_dir {
            return dir.clone();
        }
        ProjectDirs::from("", "", "taskflow")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".taskflow"))
    }

    /// Parsed default sort key, tolerating bad values by falling back.
    pub fn default_sort_key(&self) -> SortKey {
        SortKey::parse(&self.view.default_sort).unwrap_or_default()
    }

    /// Parsed default status filter, tolerating bad values by falling back.
    pub fn default_status_filter(&self) -> StatusFilter {
        StatusFilter::parse(&self.view.default_filter).unwrap_or_default()
    }
}
