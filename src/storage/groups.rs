//! Storage group repository
//!
//! The group file is only ever rewritten whole. Every mutation reads the
//! full map from disk, applies one change, writes the full map (assigning
//! contiguous group ids and backup keys) and reloads it, so the in-memory
//! map always matches what was persisted.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::{debug, info, warn};

use crate::audit::{ChangeJournal, GroupChange, Renumbered};
use crate::config::paths::GroupsPaths;
use crate::error::{GroupsError, GroupsResult};
use crate::models::{DriveRecord, GroupId, GroupMap, StorageGroupConfig};
use crate::services::status::StatusResolver;

use super::file_io::{read_optional, replace_file};

/// Load a group file, treating an absent or unparsable file as empty
pub fn load_groups(path: &Path) -> GroupMap {
    let parsed = read_optional(path).and_then(|text| match text {
        Some(text) => Ok(serde_json::from_str::<GroupMap>(&text)?),
        None => Ok(GroupMap::new()),
    });

    let groups = parsed.unwrap_or_else(|e| {
        warn!(target: "store", "Ignoring unreadable {}: {}", path.display(), e);
        GroupMap::new()
    });
    debug!(target: "store", "Loaded {} group(s) from {}", groups.len(), path.display());
    groups
}

/// Rewrite a group file with contiguous group ids and backup keys
///
/// Groups keep their relative order; the n-th group is written as "n".
pub fn write_groups(path: &Path, groups: &GroupMap) -> GroupsResult<()> {
    let renumbered: GroupMap = groups
        .values()
        .cloned()
        .zip(contiguous_ids())
        .map(|(mut group, id)| {
            group.renumber_backups();
            (id, group)
        })
        .collect();

    let contents = serde_json::to_vec_pretty(&renumbered)?;
    replace_file(path, &contents)?;
    info!(target: "store", "Wrote {} group(s) to {}", renumbered.len(), path.display());
    Ok(())
}

/// The id a newly added group receives: one past the largest id, or 1
pub fn next_group_id(groups: &GroupMap) -> GroupId {
    groups
        .keys()
        .next_back()
        .map(|id| id.next())
        .unwrap_or(GroupId::FIRST)
}

fn contiguous_ids() -> impl Iterator<Item = GroupId> {
    std::iter::successors(Some(GroupId::FIRST), |id| Some(id.next()))
}

/// Position-based id a key will have after the next write
fn id_after_renumbering(groups: &GroupMap, id: GroupId) -> Option<GroupId> {
    groups
        .keys()
        .zip(contiguous_ids())
        .find(|(key, _)| **key == id)
        .map(|(_, renumbered)| renumbered)
}

/// Groups other than `changed` whose id the next write will change
fn renumbering(groups: &GroupMap, changed: Option<GroupId>) -> Vec<Renumbered> {
    groups
        .keys()
        .zip(contiguous_ids())
        .filter(|(key, to)| *key != to && Some(**key) != changed)
        .map(|(key, to)| Renumbered { from: *key, to })
        .collect()
}

/// Process-wide repository over one group file
pub struct GroupStore {
    paths: GroupsPaths,
    data: RwLock<Option<GroupMap>>,
    journal: Option<ChangeJournal>,
}

impl GroupStore {
    /// Create a store for the group file below the given drive root
    ///
    /// Nothing is read until the groups are first accessed.
    pub fn new(paths: GroupsPaths) -> Self {
        Self {
            paths,
            data: RwLock::new(None),
            journal: None,
        }
    }

    /// Record committed changes in a journal
    pub fn with_journal(mut self, journal: ChangeJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn path(&self) -> PathBuf {
        self.paths.groups_file()
    }

    /// All groups, loading the file on first access
    pub fn groups(&self) -> GroupsResult<GroupMap> {
        {
            let data = self.data.read().map_err(|e| {
                GroupsError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            if let Some(groups) = data.as_ref() {
                return Ok(groups.clone());
            }
        }

        self.reload()
    }

    /// Get one group by id
    pub fn get(&self, id: GroupId) -> GroupsResult<Option<StorageGroupConfig>> {
        Ok(self.groups()?.get(&id).cloned())
    }

    pub fn is_empty(&self) -> GroupsResult<bool> {
        Ok(self.groups()?.is_empty())
    }

    /// Replace the in-memory map with the file's contents
    pub fn reload(&self) -> GroupsResult<GroupMap> {
        let groups = load_groups(&self.path());

        let mut data = self.data.write().map_err(|e| {
            GroupsError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = Some(groups.clone());

        Ok(groups)
    }

    /// Annotate every in-memory slot with its live drive letter
    ///
    /// Returns the number of slots whose drive is connected.
    pub fn refresh_status(&self, drives: &[DriveRecord]) -> GroupsResult<usize> {
        self.groups()?;

        let mut data = self
            .data
            .write()
            .map_err(|e| GroupsError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let available = data
            .as_mut()
            .map(|groups| StatusResolver::refresh(groups, drives))
            .unwrap_or(0);

        debug!(target: "store", "{} slot(s) connected", available);
        Ok(available)
    }

    /// Add a group (`id` None) or replace an existing one, returning its id
    ///
    /// The file is re-read, merged, rewritten and reloaded.
    pub fn save_group(
        &self,
        id: Option<GroupId>,
        group: StorageGroupConfig,
    ) -> GroupsResult<GroupId> {
        let mut groups = load_groups(&self.path());

        let (id, before) = match id {
            Some(id) => {
                let before = groups
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| GroupsError::group_not_found(id.to_string()))?;
                (id, Some(before))
            }
            None => (next_group_id(&groups), None),
        };

        groups.insert(id, group.clone());
        let final_id = id_after_renumbering(&groups, id).unwrap_or(id);
        let moved = renumbering(&groups, Some(id));

        self.write(&groups)?;
        self.reload()?;

        let change = match before {
            Some(before) => GroupChange::edited(id, &before, final_id, &group),
            None => GroupChange::added(final_id, &group),
        };
        self.record(vec![change.with_renumbering(moved)]);

        Ok(final_id)
    }

    /// Remove the given groups; absent ids are logged and ignored
    ///
    /// Returns the ids that were actually removed. When none were present
    /// nothing is written. Remaining groups are renumbered by the rewrite.
    pub fn remove_groups(&self, ids: &[GroupId]) -> GroupsResult<Vec<GroupId>> {
        let mut groups = load_groups(&self.path());
        let mut removed = Vec::new();
        let mut changes = Vec::new();

        for id in ids {
            match groups.remove(id) {
                Some(group) => {
                    changes.push(GroupChange::removed(*id, &group));
                    removed.push(*id);
                }
                None => {
                    warn!(target: "store", "Group {} not found, ignoring", id);
                }
            }
        }

        if removed.is_empty() {
            info!(target: "store", "No matching groups to remove, nothing written");
            return Ok(removed);
        }

        // Renumbering is recorded once, on the last removal
        if let Some(last) = changes.pop() {
            changes.push(last.with_renumbering(renumbering(&groups, None)));
        }

        self.write(&groups)?;
        self.reload()?;
        self.record(changes);

        Ok(removed)
    }

    /// Leave the in-memory map behind a poisoned lock
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.data.write();
            panic!("poisoning group store lock");
        }));
    }

    fn write(&self, groups: &GroupMap) -> GroupsResult<()> {
        self.paths.ensure_directories()?;
        write_groups(&self.path(), groups)
    }

    fn record(&self, changes: Vec<GroupChange>) {
        if let Some(journal) = &self.journal {
            if let Err(e) = journal.append(&changes) {
                warn!(target: "store", "Failed to write change journal: {}", e);
            }
        }
    }
}
