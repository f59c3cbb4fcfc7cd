//! Duplicate serial detection across groups
//!
//! A serial may occupy at most one slot in the whole store. Conflicts fail
//! fast when running non-interactively; interactively the user may
//! explicitly accept them.

use log::{debug, warn};

use crate::error::{GroupsError, GroupsResult, SerialConflict};
use crate::models::{GroupId, GroupMap};
use crate::prompt::Prompter;

pub struct DuplicateValidator;

impl DuplicateValidator {
    /// Every slot outside `exclude` whose serial equals a candidate
    ///
    /// Blank serials never match.
    pub fn find_conflicts(
        groups: &GroupMap,
        candidates: &[String],
        exclude: Option<GroupId>,
    ) -> Vec<SerialConflict> {
        let candidates: Vec<&str> = candidates
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let mut conflicts = Vec::new();
        for (id, group) in groups {
            if Some(*id) == exclude {
                continue;
            }

            for (slot, drive) in group.slots() {
                let serial = drive.serial();
                if !serial.is_empty() && candidates.contains(&serial) {
                    conflicts.push(SerialConflict {
                        serial: serial.to_string(),
                        group_id: id.to_string(),
                        slot,
                        label: drive.label.clone(),
                    });
                }
            }
        }

        conflicts
    }

    /// Gate a selection: Ok(true) to proceed, Ok(false) when the user declines
    pub fn check(
        groups: &GroupMap,
        candidates: &[String],
        exclude: Option<GroupId>,
        prompter: &mut Prompter,
    ) -> GroupsResult<bool> {
        let conflicts = Self::find_conflicts(groups, candidates, exclude);
        if conflicts.is_empty() {
            debug!(target: "duplicates", "No duplicate serials among {:?}", candidates);
            return Ok(true);
        }

        if prompter.is_non_interactive() {
            warn!(target: "duplicates", "Rejecting {} duplicate serial(s)", conflicts.len());
            return Err(GroupsError::DuplicateSerial { conflicts });
        }

        prompter.say("The following drives are already assigned to another group:");
        for conflict in &conflicts {
            prompter.say(format!("  - {}", conflict));
        }

        let accepted = prompter.confirm("Assign them anyway? (yes/no) [no]: ")?;
        if accepted {
            warn!(target: "duplicates", "User accepted {} duplicate serial(s)", conflicts.len());
        } else {
            debug!(target: "duplicates", "User declined duplicate assignment");
        }

        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StorageDriveConfig, StorageGroupConfig};

    fn id(n: u32) -> GroupId {
        GroupId::new(n).unwrap()
    }

    fn store() -> GroupMap {
        let mut groups = GroupMap::new();
        groups.insert(
            id(1),
            StorageGroupConfig::new(
                "Movies",
                StorageDriveConfig::new("M1", "ABC123"),
                vec![StorageDriveConfig::new("B1", "DEF456")],
            ),
        );
        groups.insert(
            id(2),
            StorageGroupConfig::new(
                "Music",
                StorageDriveConfig::new("M2", "XYZ999"),
                vec![StorageDriveConfig::new("B2", "")],
            ),
        );
        groups
    }

    fn serials(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_master_and_backup_conflicts_reported() {
        let conflicts =
            DuplicateValidator::find_conflicts(&store(), &serials(&["ABC123", "DEF456"]), None);

        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].slot, "Master");
        assert_eq!(conflicts[0].group_id, "1");
        assert_eq!(conflicts[1].slot, "Backup 1");
        assert_eq!(conflicts[1].label, "B1");
    }

    #[test]
    fn test_excluded_group_never_conflicts_with_itself() {
        let conflicts =
            DuplicateValidator::find_conflicts(&store(), &serials(&["ABC123"]), Some(id(1)));
        assert!(conflicts.is_empty());

        let conflicts =
            DuplicateValidator::find_conflicts(&store(), &serials(&["XYZ999"]), Some(id(1)));
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn test_unique_and_blank_serials_never_conflict() {
        let conflicts =
            DuplicateValidator::find_conflicts(&store(), &serials(&["NEW001", "", "  "]), None);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_non_interactive_fails_fast() {
        let mut prompter = Prompter::scripted(["yes"], true);
        let err = DuplicateValidator::check(&store(), &serials(&["ABC123"]), None, &mut prompter)
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_interactive_confirmation() {
        let mut accept = Prompter::scripted(["y"], false);
        assert!(
            DuplicateValidator::check(&store(), &serials(&["ABC123"]), None, &mut accept).unwrap()
        );

        let mut decline = Prompter::scripted(["n"], false);
        assert!(
            !DuplicateValidator::check(&store(), &serials(&["ABC123"]), None, &mut decline)
                .unwrap()
        );

        let mut exhausted = Prompter::scripted(Vec::<String>::new(), false);
        assert!(
            !DuplicateValidator::check(&store(), &serials(&["ABC123"]), None, &mut exhausted)
                .unwrap()
        );
    }

    #[test]
    fn test_no_conflicts_needs_no_answer() {
        let mut prompter = Prompter::scripted(Vec::<String>::new(), true);
        assert!(
            DuplicateValidator::check(&store(), &serials(&["NEW"]), None, &mut prompter).unwrap()
        );
    }
}
