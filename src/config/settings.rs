//! User settings for storage groups
//!
//! Preferences stored next to the group file: prompting mode, audit logging,
//! and an optional device fixture that replaces the host storage API.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::GroupsPaths;
use crate::error::GroupsError;
use crate::storage::file_io::{read_optional, replace_file};

/// User settings for storage groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Fail instead of prompting whenever input would be required
    #[serde(default)]
    pub non_interactive: bool,

    /// Whether committed changes are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    /// JSON device fixture used instead of querying the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_fixture: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            non_interactive: false,
            audit_enabled: default_audit_enabled(),
            device_fixture: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_default(paths: &GroupsPaths) -> Result<Self, GroupsError> {
        let Some(contents) = read_optional(&paths.settings_file())? else {
            return Ok(Settings::default());
        };

        serde_json::from_str(&contents)
            .map_err(|e| GroupsError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &GroupsPaths) -> Result<(), GroupsError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| GroupsError::Config(format!("Failed to serialize settings: {}", e)))?;

        replace_file(&paths.settings_file(), contents.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.non_interactive);
        assert!(settings.audit_enabled);
        assert!(settings.device_fixture.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GroupsPaths::with_root(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_default(&paths).unwrap();
        assert_eq!(settings.schema_version, 1);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GroupsPaths::with_root(temp_dir.path().to_path_buf());

        let settings = Settings {
            non_interactive: true,
            audit_enabled: false,
            device_fixture: Some(PathBuf::from("fixture.json")),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert!(loaded.non_interactive);
        assert!(!loaded.audit_enabled);
        assert_eq!(loaded.device_fixture, Some(PathBuf::from("fixture.json")));
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GroupsPaths::with_root(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"non_interactive": true}"#).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert!(loaded.non_interactive);
        assert!(loaded.audit_enabled);
    }
}
