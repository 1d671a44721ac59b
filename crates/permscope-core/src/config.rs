//! User configuration
//!
//! Stored in `~/.config/permscope/config.yaml`. Every field is optional;
//! command-line flags take precedence over file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Default number of concurrent access reviews
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default cap on listed releases
pub const DEFAULT_PAGE_SIZE: usize = 256;

/// Permscope configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Maximum number of access reviews in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Maximum number of releases returned by a listing (0 = unlimited)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Where release revisions are read from
    #[serde(default)]
    pub storage: StorageKind,

    /// Revisions file used by the `file` storage
    #[serde(default)]
    pub revisions_file: Option<PathBuf>,

    /// User to impersonate for access reviews
    #[serde(default)]
    pub impersonate: Option<String>,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            page_size: DEFAULT_PAGE_SIZE,
            storage: StorageKind::default(),
            revisions_file: None,
            impersonate: None,
        }
    }
}

/// Release revision source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Helm release Secrets in the cluster
    #[default]
    Secrets,
    /// A local revisions file
    File,
}

impl Settings {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_yaml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| CoreError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("permscope").join("config.yaml"))
    }

    fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(CoreError::InvalidConfig {
                message: "concurrency must be at least 1".to_string(),
            });
        }
        if self.storage == StorageKind::File && self.revisions_file.is_none() {
            return Err(CoreError::InvalidConfig {
                message: "storage 'file' requires revisionsFile".to_string(),
            });
        }
        Ok(())
    }
}
