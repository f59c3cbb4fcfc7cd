//! Append-only change journal
//!
//! One JSON object per line. Lines that no longer parse are skipped when
//! reading so a damaged entry never hides the rest of the history.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::warn;

use crate::error::{GroupsError, GroupsResult};
use crate::storage::file_io::read_optional;

use super::change::GroupChange;

pub struct ChangeJournal {
    path: PathBuf,
}

impl ChangeJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append the changes of one write
    pub fn append(&self, changes: &[GroupChange]) -> GroupsResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut lines = String::new();
        for change in changes {
            lines.push_str(&serde_json::to_string(change)?);
            lines.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                GroupsError::Io(format!("Failed to open {}: {}", self.path.display(), e))
            })?;
        file.write_all(lines.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// The last `count` changes, oldest first
    pub fn recent(&self, count: usize) -> GroupsResult<Vec<GroupChange>> {
        let Some(text) = read_optional(&self.path)? else {
            return Ok(Vec::new());
        };

        let mut changes: Vec<GroupChange> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str(line) {
                Ok(change) => Some(change),
                Err(e) => {
                    warn!(target: "store", "Skipping journal line {}: {}", n + 1, e);
                    None
                }
            })
            .collect();

        let skip = changes.len().saturating_sub(count);
        Ok(changes.split_off(skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::ChangeKind;
    use crate::models::{GroupId, StorageDriveConfig, StorageGroupConfig};
    use tempfile::TempDir;

    fn change(n: u32) -> GroupChange {
        let group = StorageGroupConfig::new(
            format!("G{}", n),
            StorageDriveConfig::new("M", format!("S{}", n)),
            vec![],
        );
        GroupChange::added(GroupId::new(n).unwrap(), &group)
    }

    #[test]
    fn test_missing_journal_is_empty() {
        let dir = TempDir::new().unwrap();
        let journal = ChangeJournal::new(dir.path().join("audit.log"));
        assert!(journal.recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_recent_keeps_the_newest() {
        let dir = TempDir::new().unwrap();
        let journal = ChangeJournal::new(dir.path().join("audit.log"));

        journal.append(&[change(1), change(2)]).unwrap();
        journal.append(&[change(3)]).unwrap();

        let recent = journal.recent(2).unwrap();
        let ids: Vec<u32> = recent.iter().map(|c| c.group.get()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(recent[0].kind, ChangeKind::Added);
    }

    #[test]
    fn test_damaged_line_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");
        let journal = ChangeJournal::new(path.clone());
        journal.append(&[change(1)]).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{\"kind\": \"added\", truncated").unwrap();
        journal.append(&[change(2)]).unwrap();

        assert_eq!(journal.recent(10).unwrap().len(), 2);
    }
}
