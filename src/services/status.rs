//! Live availability of group slots
//!
//! Matches persisted serials against freshly enumerated drives and records
//! the drive letter of each match. Only the in-memory drive letters change.

use log::debug;

use crate::models::{DriveRecord, GroupMap};

pub struct StatusResolver;

impl StatusResolver {
    /// Set or clear the drive letter of every slot; returns how many are available
    ///
    /// Serials match exactly after trimming surrounding whitespace.
    pub fn refresh(groups: &mut GroupMap, drives: &[DriveRecord]) -> usize {
        let mut available = 0;

        for (id, group) in groups.iter_mut() {
            for slot in group.slots_mut() {
                let serial = slot.serial();
                let letter = if serial.is_empty() {
                    None
                } else {
                    drives
                        .iter()
                        .find(|d| d.serial_number.trim() == serial)
                        .map(|d| d.drive_letter.clone())
                };

                match letter {
                    Some(letter) => {
                        slot.drive_letter = letter;
                        available += 1;
                    }
                    None => slot.drive_letter.clear(),
                }
            }
            debug!(target: "status", "Resolved status for group {}", id);
        }

        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, SlotKey, StorageDriveConfig, StorageGroupConfig};

    fn drive(serial: &str, letter: &str) -> DriveRecord {
        DriveRecord {
            serial_number: serial.into(),
            drive_letter: letter.into(),
            ..DriveRecord::default()
        }
    }

    fn groups() -> GroupMap {
        let mut groups = GroupMap::new();
        groups.insert(
            GroupId::FIRST,
            StorageGroupConfig::new(
                "Movies",
                StorageDriveConfig::new("M", " ABC123 "),
                vec![
                    StorageDriveConfig::new("B1", "def456"),
                    StorageDriveConfig::new("B2", ""),
                ],
            ),
        );
        groups
    }

    #[test]
    fn test_match_is_trimmed_and_case_sensitive() {
        let mut groups = groups();
        let drives = vec![drive("ABC123  ", "E:"), drive("DEF456", "F:")];

        let available = StatusResolver::refresh(&mut groups, &drives);

        let group = &groups[&GroupId::FIRST];
        assert_eq!(available, 1);
        assert_eq!(group.master.drive_letter, "E:");
        assert_eq!(group.backups[&SlotKey::FIRST].drive_letter, "");
        assert_eq!(group.master.serial_number, " ABC123 ");
    }

    #[test]
    fn test_unmatched_slot_is_cleared() {
        let mut groups = groups();
        StatusResolver::refresh(&mut groups, &[drive("ABC123", "E:")]);
        StatusResolver::refresh(&mut groups, &[]);

        assert_eq!(groups[&GroupId::FIRST].master.drive_letter, "");
    }

    #[test]
    fn test_blank_serial_never_matches_blank_drive() {
        let mut groups = groups();
        StatusResolver::refresh(&mut groups, &[drive("", "G:")]);

        let backup = &groups[&GroupId::FIRST].backups[&SlotKey::new(2).unwrap()];
        assert_eq!(backup.drive_letter, "");
    }

    #[test]
    fn test_idempotent() {
        let drives = vec![drive("ABC123", "E:"), drive("def456", "F:")];
        let mut once = groups();
        StatusResolver::refresh(&mut once, &drives);
        let mut twice = once.clone();
        StatusResolver::refresh(&mut twice, &drives);

        assert_eq!(once, twice);
    }
}
