//! Storage group management menu
//!
//! A loop over Edit / Add / Remove / Back. Failures of a single action are
//! reported as that action's outcome and the loop carries on.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::devices::{DeviceEnumerator, StorageApi};
use crate::display::{format_group_details, format_group_list};
use crate::error::GroupsResult;
use crate::models::GroupId;
use crate::prompt::Prompter;
use crate::storage::GroupStore;
use crate::wizard::{ConfigWizard, WizardMode, WizardResult};

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Edit,
    Add,
    Remove,
    Back,
}

impl MenuAction {
    fn key(self) -> &'static str {
        match self {
            Self::Edit => "e",
            Self::Add => "a",
            Self::Remove => "r",
            Self::Back => "b",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit => write!(f, "Edit a storage group"),
            Self::Add => write!(f, "Add a storage group"),
            Self::Remove => write!(f, "Remove storage groups"),
            Self::Back => write!(f, "Back"),
        }
    }
}

/// What one menu action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOutcome {
    pub success: bool,
    pub message: String,
}

impl MenuOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    fn from_wizard(result: WizardResult) -> Self {
        match result.group_id {
            Some(id) if result.completed => Self::success(format!("Saved storage group {}.", id)),
            _ => Self::unchanged("No changes made."),
        }
    }
}

pub struct GroupManager<'a> {
    store: &'a GroupStore,
    api: &'a dyn StorageApi,
}

impl<'a> GroupManager<'a> {
    pub fn new(store: &'a GroupStore, api: &'a dyn StorageApi) -> Self {
        Self { store, api }
    }

    /// Entries currently offered; Edit and Remove need at least one group
    pub fn actions(&self) -> GroupsResult<Vec<MenuAction>> {
        if self.store.is_empty()? {
            Ok(vec![MenuAction::Add, MenuAction::Back])
        } else {
            Ok(vec![
                MenuAction::Edit,
                MenuAction::Add,
                MenuAction::Remove,
                MenuAction::Back,
            ])
        }
    }

    /// Run the menu until Back or the end of input, returning every outcome
    pub fn run(&self, prompter: &mut Prompter) -> GroupsResult<Vec<MenuOutcome>> {
        let mut outcomes = Vec::new();

        loop {
            if let Err(e) = self.show_groups(prompter) {
                warn!(target: "manager", "Failed to show groups: {}", e);
                prompter.say(format!("Error: {}", e));
            }

            let actions = self.actions().unwrap_or_else(|e| {
                warn!(target: "manager", "Failed to read groups: {}", e);
                vec![MenuAction::Add, MenuAction::Back]
            });
            for (i, action) in actions.iter().enumerate() {
                prompter.say(format!("  {}. [{}] {}", i + 1, action.key(), action));
            }

            let Some(answer) = prompter.ask("Choose an option: ")? else {
                debug!(target: "manager", "Input exhausted, leaving menu");
                break;
            };

            let Some(action) = Self::parse_action(&answer, &actions) else {
                prompter.say(format!("'{}' is not a menu option.", answer));
                continue;
            };
            if action == MenuAction::Back {
                break;
            }

            let outcome = self.perform(action, prompter);
            prompter.say(&outcome.message);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Run one action, turning any error into a failed outcome
    pub fn perform(&self, action: MenuAction, prompter: &mut Prompter) -> MenuOutcome {
        debug!(target: "manager", "Menu action: {:?}", action);

        let result = match action {
            MenuAction::Edit => self.edit(prompter),
            MenuAction::Add => self.add(prompter),
            MenuAction::Remove => self.remove(prompter),
            MenuAction::Back => Ok(MenuOutcome::unchanged("")),
        };

        result.unwrap_or_else(|e| {
            warn!(target: "manager", "{:?} failed: {}", action, e);
            MenuOutcome::unchanged(format!("Error: {}", e))
        })
    }

    pub fn add(&self, prompter: &mut Prompter) -> GroupsResult<MenuOutcome> {
        let result = ConfigWizard::new(self.store, self.api).run(WizardMode::Add, prompter)?;
        Ok(MenuOutcome::from_wizard(result))
    }

    /// Ask for a group id, then edit it
    pub fn edit(&self, prompter: &mut Prompter) -> GroupsResult<MenuOutcome> {
        let Some(answer) = prompter.ask("Group to edit (id): ")? else {
            return Ok(MenuOutcome::unchanged("No changes made."));
        };
        if answer.trim().is_empty() {
            return Ok(MenuOutcome::unchanged("No changes made."));
        }

        let id = GroupId::from_str(&answer)?;
        self.edit_group(id, prompter)
    }

    pub fn edit_group(&self, id: GroupId, prompter: &mut Prompter) -> GroupsResult<MenuOutcome> {
        let result = ConfigWizard::new(self.store, self.api).run(WizardMode::Edit(id), prompter)?;
        Ok(MenuOutcome::from_wizard(result))
    }

    /// Ask for ids, then confirm and remove them
    pub fn remove(&self, prompter: &mut Prompter) -> GroupsResult<MenuOutcome> {
        let Some(answer) = prompter.ask("Groups to remove (comma-separated ids): ")? else {
            return Ok(MenuOutcome::unchanged("No changes made."));
        };

        let ids = Self::parse_ids(&answer)?;
        if ids.is_empty() {
            return Ok(MenuOutcome::unchanged("No changes made."));
        }

        self.remove_groups(&ids, prompter, false)
    }

    /// Remove the given groups after confirmation unless `assume_yes`
    pub fn remove_groups(
        &self,
        ids: &[GroupId],
        prompter: &mut Prompter,
        assume_yes: bool,
    ) -> GroupsResult<MenuOutcome> {
        let groups = self.store.groups()?;
        for id in ids {
            if let Some(group) = groups.get(id) {
                prompter.say(format_group_details(*id, group));
            }
        }

        let list = join_ids(ids);
        if !assume_yes {
            let question = format!("Remove group(s) {}? (yes/no) [no]: ", list);
            if !prompter.confirm(&question)? {
                return Ok(MenuOutcome::unchanged("Removal cancelled. No changes made."));
            }
        }

        let removed = self.store.remove_groups(ids)?;
        self.refresh()?;

        if removed.is_empty() {
            Ok(MenuOutcome::unchanged(format!(
                "No storage group matches {}. Nothing removed.",
                list
            )))
        } else {
            Ok(MenuOutcome::success(format!(
                "Removed storage group(s) {}.",
                join_ids(&removed)
            )))
        }
    }

    /// Re-enumerate drives and update every group's live status
    ///
    /// Returns how many slots have a connected drive.
    pub fn refresh(&self) -> GroupsResult<usize> {
        let drives = DeviceEnumerator::new(self.api).list_drives();
        self.store.refresh_status(&drives)
    }

    fn show_groups(&self, prompter: &Prompter) -> GroupsResult<()> {
        self.refresh()?;
        prompter.say("");
        prompter.say(format_group_list(&self.store.groups()?));
        prompter.say("");
        Ok(())
    }

    fn parse_action(answer: &str, actions: &[MenuAction]) -> Option<MenuAction> {
        let answer = answer.trim().to_lowercase();
        if let Ok(n) = answer.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| actions.get(i)).copied();
        }
        actions.iter().copied().find(|a| a.key() == answer)
    }

    fn parse_ids(answer: &str) -> GroupsResult<Vec<GroupId>> {
        let mut ids = Vec::new();
        for token in answer.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let id = GroupId::from_str(token)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

fn join_ids(ids: &[GroupId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupsPaths;
    use crate::devices::enumerator::tests::usb_stick;
    use crate::devices::StorageTables;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: GroupStore,
        tables: StorageTables,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = GroupStore::new(GroupsPaths::with_root(dir.path().to_path_buf()));
        let mut tables = StorageTables::default();
        usb_stick(&mut tables, 1, "E:", "AAA");
        usb_stick(&mut tables, 2, "F:", "BBB");
        usb_stick(&mut tables, 3, "G:", "CCC");
        Fixture {
            _dir: dir,
            store,
            tables,
        }
    }

    fn id(n: u32) -> GroupId {
        GroupId::new(n).unwrap()
    }

    #[test]
    fn test_edit_and_remove_hidden_when_empty() {
        let f = fixture();
        let manager = GroupManager::new(&f.store, &f.tables);
        assert_eq!(
            manager.actions().unwrap(),
            vec![MenuAction::Add, MenuAction::Back]
        );
    }

    #[test]
    fn test_add_through_menu() {
        let f = fixture();
        let manager = GroupManager::new(&f.store, &f.tables);
        let mut prompter = Prompter::scripted(["a", "Movies", "1", "1", "b"], true);

        let outcomes = manager.run(&mut prompter).unwrap();

        assert_eq!(
            outcomes,
            vec![MenuOutcome::success("Saved storage group 1.")]
        );
        assert_eq!(manager.actions().unwrap().len(), 4);
        assert_eq!(
            f.store.get(id(1)).unwrap().unwrap().master.drive_letter,
            "E:"
        );
    }

    #[test]
    fn test_hidden_action_is_rejected() {
        let f = fixture();
        let manager = GroupManager::new(&f.store, &f.tables);
        // "e" is not offered on an empty store, "3" is out of range
        let mut prompter = Prompter::scripted(["e", "3"], true);

        assert!(manager.run(&mut prompter).unwrap().is_empty());
    }

    #[test]
    fn test_store_failure_is_reported_and_menu_continues() {
        let f = fixture();
        f.store.poison();
        let manager = GroupManager::new(&f.store, &f.tables);
        let mut prompter = Prompter::scripted(["x", "a", "b"], true);

        let outcomes = manager.run(&mut prompter).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
        assert!(outcomes[0].message.starts_with("Error:"));
    }

    #[test]
    fn test_errors_do_not_end_the_loop() {
        let f = fixture();
        let manager = GroupManager::new(&f.store, &f.tables);
        let mut prompter = Prompter::scripted(
            ["a", "One", "1", "", "e", "9", "e", "zero", "a", "Two", "1", ""],
            true,
        );

        let outcomes = manager.run(&mut prompter).unwrap();

        assert_eq!(outcomes.len(), 4);
        assert!(!outcomes[1].success);
        assert!(outcomes[1].message.contains("not found"));
        assert!(!outcomes[2].success);
        assert!(outcomes[3].success);
        assert_eq!(f.store.groups().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_requires_confirmation() {
        let f = fixture();
        let manager = GroupManager::new(&f.store, &f.tables);
        for (name, pick) in [("One", "1"), ("Two", "1"), ("Three", "1")] {
            manager
                .add(&mut Prompter::scripted([name, pick, ""], true))
                .unwrap();
        }

        let declined = manager
            .remove(&mut Prompter::scripted(["1"], true))
            .unwrap();
        assert!(!declined.success);
        assert_eq!(f.store.groups().unwrap().len(), 3);

        let removed = manager
            .remove(&mut Prompter::scripted(["1", "yes"], true))
            .unwrap();
        assert_eq!(removed, MenuOutcome::success("Removed storage group(s) 1."));

        let groups = f.store.groups().unwrap();
        let names: Vec<_> = groups.values().map(|g| g.display_name.as_str()).collect();
        assert_eq!(names, vec!["Two", "Three"]);
        assert_eq!(groups[&id(1)].master.drive_letter, "F:");
    }

    #[test]
    fn test_remove_unknown_ids_writes_nothing() {
        let f = fixture();
        let manager = GroupManager::new(&f.store, &f.tables);
        manager
            .add(&mut Prompter::scripted(["One", "1", ""], true))
            .unwrap();
        let before = std::fs::read_to_string(f.store.path()).unwrap();

        let outcome = manager
            .remove_groups(&[id(5)], &mut Prompter::scripted(Vec::<String>::new(), true), true)
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(std::fs::read_to_string(f.store.path()).unwrap(), before);
    }

    #[test]
    fn test_edit_through_menu() {
        let f = fixture();
        let manager = GroupManager::new(&f.store, &f.tables);
        manager
            .add(&mut Prompter::scripted(["One", "1", ""], true))
            .unwrap();

        let outcome = manager
            .edit(&mut Prompter::scripted(["1", "Renamed", "", "2"], true))
            .unwrap();

        assert!(outcome.success);
        let group = f.store.get(id(1)).unwrap().unwrap();
        assert_eq!(group.display_name, "Renamed");
        assert_eq!(group.serials(), vec!["AAA", "CCC"]);
    }
}
