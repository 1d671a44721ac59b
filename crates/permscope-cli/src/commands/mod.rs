//! CLI commands

pub mod can_i;
pub mod list;
pub mod validate;

use permscope_core::{CoreError, Settings};
use std::path::Path;

use crate::error::{CliError, Result};

const SETTINGS_HELP: &str =
    "known keys: concurrency, pageSize, storage (secrets|file), revisionsFile, impersonate";

/// Load settings from `path`, or from the default location when absent
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let loaded = match path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    loaded.map_err(|e| match e {
        CoreError::Io(io) => CliError::from(io),
        CoreError::InvalidConfig { message } => CliError::config_with_help(message, SETTINGS_HELP),
        other => CliError::config_with_help(other.to_string(), SETTINGS_HELP),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use permscope_core::StorageKind;

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "concurrency: 2\nstorage: file\nrevisionsFile: /tmp/r.yaml\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.concurrency, 2);
        assert_eq!(settings.storage, StorageKind::File);
    }

    #[test]
    fn test_invalid_settings_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "concurrency: 0\n").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_missing_explicit_settings_is_io_error() {
        let err = load_settings(Some(Path::new("/nonexistent/permscope.yaml"))).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
