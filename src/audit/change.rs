//! Recorded changes to storage groups
//!
//! A change names the group, which drive serials moved in or out of each
//! slot, and how the remaining groups were renumbered by the write.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{GroupId, StorageGroupConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Edited,
    Removed,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Edited => write!(f, "edited"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Serial held by one slot before and after a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChange {
    /// "Master" or "Backup <n>"
    pub slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// A group that received a new id when the file was rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renumbered {
    pub from: GroupId,
    pub to: GroupId,
}

/// One committed change to one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChange {
    pub at: DateTime<Utc>,
    pub kind: ChangeKind,
    /// Id after the write for additions and edits, before it for removals
    pub group: GroupId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renamed_from: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub renumbered: Vec<Renumbered>,
}

impl GroupChange {
    fn new(kind: ChangeKind, id: GroupId, group: &StorageGroupConfig) -> Self {
        Self {
            at: Utc::now(),
            kind,
            group: id,
            name: group.name_or_default(id),
            renamed_from: None,
            slots: Vec::new(),
            renumbered: Vec::new(),
        }
    }

    pub fn added(id: GroupId, group: &StorageGroupConfig) -> Self {
        Self {
            slots: slot_changes(None, Some(group)),
            ..Self::new(ChangeKind::Added, id, group)
        }
    }

    /// `before_id` is the id the group had before the write
    pub fn edited(
        before_id: GroupId,
        before: &StorageGroupConfig,
        id: GroupId,
        after: &StorageGroupConfig,
    ) -> Self {
        let old_name = before.name_or_default(before_id);
        let mut change = Self::new(ChangeKind::Edited, id, after);
        change.renamed_from = (old_name != change.name).then_some(old_name);
        change.slots = slot_changes(Some(before), Some(after));
        change
    }

    pub fn removed(id: GroupId, group: &StorageGroupConfig) -> Self {
        Self {
            slots: slot_changes(Some(group), None),
            ..Self::new(ChangeKind::Removed, id, group)
        }
    }

    pub fn with_renumbering(mut self, renumbered: Vec<Renumbered>) -> Self {
        self.renumbered = renumbered;
        self
    }

    /// Multi-line summary for `sgroups history`
    pub fn describe(&self) -> String {
        let mut out = format!(
            "[{}] {} group {} ({})",
            self.at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.kind,
            self.group,
            self.name
        );

        if let Some(old) = &self.renamed_from {
            out.push_str(&format!("\n  Renamed from \"{}\"", old));
        }
        for slot in &self.slots {
            out.push_str(&format!(
                "\n  {}: {} -> {}",
                slot.slot,
                slot.from.as_deref().unwrap_or("(none)"),
                slot.to.as_deref().unwrap_or("(none)")
            ));
        }
        if !self.renumbered.is_empty() {
            let moves: Vec<String> = self
                .renumbered
                .iter()
                .map(|r| format!("{} -> {}", r.from, r.to))
                .collect();
            out.push_str(&format!("\n  Renumbered: {}", moves.join(", ")));
        }

        out
    }
}

/// Slots whose serial differs between two versions of a group
///
/// Slots are compared by role and position, so a backup moving from slot 2
/// to slot 1 shows up in both slots.
fn slot_changes(
    before: Option<&StorageGroupConfig>,
    after: Option<&StorageGroupConfig>,
) -> Vec<SlotChange> {
    let serials = |group: Option<&StorageGroupConfig>| -> Vec<(String, String)> {
        group
            .map(|g| {
                g.slots()
                    .map(|(slot, drive)| (slot, drive.serial().to_string()))
                    .collect()
            })
            .unwrap_or_default()
    };
    let before = serials(before);
    let after = serials(after);

    let lookup = |side: &[(String, String)], slot: &str| {
        side.iter()
            .find(|(name, serial)| name == slot && !serial.is_empty())
            .map(|(_, serial)| serial.clone())
    };

    let mut order: Vec<&String> = before.iter().map(|(slot, _)| slot).collect();
    for (slot, _) in &after {
        if !order.contains(&slot) {
            order.push(slot);
        }
    }

    order
        .into_iter()
        .filter_map(|slot| {
            let from = lookup(before.as_slice(), slot.as_str());
            let to = lookup(after.as_slice(), slot.as_str());
            (from != to).then(|| SlotChange {
                slot: slot.clone(),
                from,
                to,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StorageDriveConfig;

    fn group(name: &str, master: &str, backups: &[&str]) -> StorageGroupConfig {
        StorageGroupConfig::new(
            name,
            StorageDriveConfig::new("M", master),
            backups.iter().map(|s| StorageDriveConfig::new("B", *s)),
        )
    }

    fn id(n: u32) -> GroupId {
        GroupId::new(n).unwrap()
    }

    #[test]
    fn test_added_lists_every_slot() {
        let change = GroupChange::added(id(1), &group("Movies", "ABC123", &["DEF456"]));

        assert_eq!(change.kind, ChangeKind::Added);
        assert_eq!(change.name, "Movies");
        assert_eq!(
            change.slots,
            vec![
                SlotChange {
                    slot: "Master".into(),
                    from: None,
                    to: Some("ABC123".into()),
                },
                SlotChange {
                    slot: "Backup 1".into(),
                    from: None,
                    to: Some("DEF456".into()),
                },
            ]
        );
    }

    #[test]
    fn test_edit_records_only_changed_slots() {
        let before = group("Movies", "ABC123", &["DEF456", "GHI789"]);
        let after = group("Films", "ABC123", &["GHI789"]);

        let change = GroupChange::edited(id(2), &before, id(1), &after);

        assert_eq!(change.group, id(1));
        assert_eq!(change.renamed_from.as_deref(), Some("Movies"));
        let touched: Vec<&str> = change.slots.iter().map(|s| s.slot.as_str()).collect();
        assert_eq!(touched, vec!["Backup 1", "Backup 2"]);
        assert_eq!(change.slots[1].to, None);
    }

    #[test]
    fn test_unchanged_name_is_not_a_rename() {
        let unnamed = group("", "S1", &[]);
        let change = GroupChange::edited(id(3), &unnamed, id(3), &group("", "S2", &[]));

        assert!(change.renamed_from.is_none());
        assert_eq!(change.name, "Storage Group 3");
    }

    #[test]
    fn test_serials_compare_trimmed() {
        let before = group("X", " S1 ", &[]);
        let after = group("X", "S1", &[]);
        assert!(slot_changes(Some(&before), Some(&after)).is_empty());
    }

    #[test]
    fn test_describe() {
        let change = GroupChange::removed(id(1), &group("Old", "S1", &[])).with_renumbering(vec![
            Renumbered {
                from: id(2),
                to: id(1),
            },
        ]);

        let text = change.describe();
        assert!(text.contains("removed group 1 (Old)"));
        assert!(text.contains("Master: S1 -> (none)"));
        assert!(text.contains("Renumbered: 2 -> 1"));
    }
}
