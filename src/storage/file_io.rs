//! Whole-file reads and replacements
//!
//! Files on the drive are never edited in place. A replacement is written to
//! a sibling temp file and renamed over the target, so readers see either
//! the old contents or the new ones.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{GroupsError, GroupsResult};

/// Contents of a file, or None when it does not exist
pub fn read_optional(path: &Path) -> GroupsResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(GroupsError::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Replace a file's contents with a single rename
///
/// The parent directory must exist. On failure the target is untouched and
/// the temp file is removed.
pub fn replace_file(path: &Path, contents: &[u8]) -> GroupsResult<()> {
    let temp = temp_sibling(path);

    let written = File::create(&temp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp, path));

    written.map_err(|e| {
        let _ = fs::remove_file(&temp);
        GroupsError::Storage(format!("Failed to replace {}: {}", path.display(), e))
    })
}

/// "groups.json" becomes "groups.json.tmp" in the same directory
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("file"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            read_optional(&dir.path().join("groups.json")).unwrap(),
            None
        );
    }

    #[test]
    fn test_replace_overwrites_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("groups.json");
        fs::write(&path, "old").unwrap();

        replace_file(&path, b"{\"1\": {}}").unwrap();

        assert_eq!(
            read_optional(&path).unwrap().as_deref(),
            Some("{\"1\": {}}")
        );
        assert!(!dir.path().join("groups.json.tmp").exists());
    }

    #[test]
    fn test_replace_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unplugged").join("groups.json");

        let err = replace_file(&path, b"{}").unwrap_err();

        assert!(matches!(err, GroupsError::Storage(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_sibling_keeps_extension() {
        let temp = temp_sibling(Path::new("/drive/.storage-groups/groups.json"));
        assert_eq!(
            temp,
            PathBuf::from("/drive/.storage-groups/groups.json.tmp")
        );
    }
}
