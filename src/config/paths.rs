//! Path management for storage groups
//!
//! The group file lives on the drive it describes, under a fixed relative
//! directory below the drive root.
//!
//! ## Root Resolution Order
//!
//! 1. Explicit root passed by the caller (the `--root` flag)
//! 2. `STORAGE_GROUPS_ROOT` environment variable (if set)
//! 3. The filesystem root of the current working directory

use std::path::{Path, PathBuf};

use crate::error::GroupsError;

/// Directory below the drive root that holds all files
pub const CONFIG_DIR_NAME: &str = ".storage-groups";

/// Manages all paths used by storage groups
#[derive(Debug, Clone)]
pub struct GroupsPaths {
    /// Drive root the configuration belongs to
    root: PathBuf,
}

impl GroupsPaths {
    /// Resolve paths, preferring an explicit root over the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new(explicit_root: Option<PathBuf>) -> Result<Self, GroupsError> {
        let root = match explicit_root {
            Some(root) => root,
            None => match std::env::var("STORAGE_GROUPS_ROOT") {
                Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
                _ => resolve_default_root()?,
            },
        };

        Ok(Self { root })
    }

    /// Create GroupsPaths with a custom root (useful for testing)
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the drive root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config directory (<root>/.storage-groups/)
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR_NAME)
    }

    /// Get the path to the group file
    pub fn groups_file(&self) -> PathBuf {
        self.config_dir().join("groups.json")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir().join("settings.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.config_dir().join("audit.log")
    }

    /// Ensure the config directory exists
    ///
    /// The drive root itself is never created: a missing root means the
    /// drive is not attached.
    pub fn ensure_directories(&self) -> Result<(), GroupsError> {
        if !self.root.is_dir() {
            return Err(GroupsError::RootUnavailable {
                path: self.root.clone(),
            });
        }

        std::fs::create_dir_all(self.config_dir())
            .map_err(|e| GroupsError::Io(format!("Failed to create config directory: {}", e)))?;

        Ok(())
    }
}

/// The filesystem root of the current directory ("/" or "C:\")
fn resolve_default_root() -> Result<PathBuf, GroupsError> {
    let cwd = std::env::current_dir()
        .map_err(|e| GroupsError::Config(format!("Could not determine current directory: {}", e)))?;

    Ok(cwd
        .ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or(cwd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_root() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GroupsPaths::with_root(temp_dir.path().to_path_buf());

        assert_eq!(paths.root(), temp_dir.path());
        assert_eq!(
            paths.groups_file(),
            temp_dir.path().join(".storage-groups").join("groups.json")
        );
        assert_eq!(
            paths.settings_file(),
            temp_dir.path().join(".storage-groups").join("settings.json")
        );
    }

    #[test]
    fn test_explicit_root_wins() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GroupsPaths::new(Some(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(paths.root(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GroupsPaths::with_root(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();
        assert!(paths.config_dir().exists());
    }

    #[test]
    fn test_missing_root_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GroupsPaths::with_root(temp_dir.path().join("not-mounted"));

        let err = paths.ensure_directories().unwrap_err();
        assert!(matches!(err, GroupsError::RootUnavailable { .. }));
    }
}
