//! Storage group CLI commands
//!
//! Bridges clap arguments to the wizard, the store and the management menu.

use clap::Args;
use log::warn;

use crate::devices::{DeviceEnumerator, StorageApi};
use crate::display::{format_group_details, format_group_list};
use crate::error::{GroupsError, GroupsResult};
use crate::models::{GroupId, StorageDriveConfig, StorageGroupConfig};
use crate::prompt::Prompter;
use crate::services::GroupManager;
use crate::storage::GroupStore;
use crate::wizard::{ConfigWizard, WizardMode};

/// Arguments of `add`
///
/// With `--master` the group is built from the flags and committed without
/// running the wizard.
#[derive(Args, Debug, Default)]
pub struct AddArgs {
    /// Display name (defaults to "Storage Group <id>")
    #[arg(short, long)]
    pub name: Option<String>,

    /// Serial number of the master drive
    #[arg(short, long)]
    pub master: Option<String>,

    /// Serial numbers of backup drives, in order
    #[arg(short, long = "backup", value_delimiter = ',')]
    pub backups: Vec<String>,
}

/// Show every group with live status
pub fn handle_list_command(store: &GroupStore, api: &dyn StorageApi) -> GroupsResult<()> {
    let available = GroupManager::new(store, api).refresh()?;
    let groups = store.groups()?;

    println!("{}", format_group_list(&groups));
    for (id, group) in &groups {
        println!();
        print!("{}", format_group_details(*id, group));
    }

    if !groups.is_empty() {
        let slots: usize = groups.values().map(|g| 1 + g.backups.len()).sum();
        println!();
        println!("{} of {} drive(s) connected.", available, slots);
    }
    Ok(())
}

pub fn handle_add_command(
    store: &GroupStore,
    api: &dyn StorageApi,
    prompter: &mut Prompter,
    args: AddArgs,
) -> GroupsResult<()> {
    let wizard = ConfigWizard::new(store, api);

    let Some(master) = args.master else {
        if args.name.is_some() || !args.backups.is_empty() {
            return Err(GroupsError::Validation(
                "--name and --backup require --master".into(),
            ));
        }
        wizard.run(WizardMode::Add, prompter)?;
        return Ok(());
    };

    let group = group_from_serials(api, args.name.unwrap_or_default(), &master, &args.backups)?;
    wizard.commit(WizardMode::Add, group, prompter)?;
    Ok(())
}

pub fn handle_edit_command(
    store: &GroupStore,
    api: &dyn StorageApi,
    prompter: &mut Prompter,
    id: GroupId,
) -> GroupsResult<()> {
    ConfigWizard::new(store, api).run(WizardMode::Edit(id), prompter)?;
    Ok(())
}

pub fn handle_remove_command(
    store: &GroupStore,
    api: &dyn StorageApi,
    prompter: &mut Prompter,
    ids: &[GroupId],
    yes: bool,
) -> GroupsResult<()> {
    let outcome = GroupManager::new(store, api).remove_groups(ids, prompter, yes)?;
    println!("{}", outcome.message);
    Ok(())
}

/// Run the interactive management menu
pub fn handle_manage_command(
    store: &GroupStore,
    api: &dyn StorageApi,
    prompter: &mut Prompter,
) -> GroupsResult<()> {
    let outcomes = GroupManager::new(store, api).run(prompter)?;
    let changed = outcomes.iter().filter(|o| o.success).count();
    println!("{} change(s) saved.", changed);
    Ok(())
}

/// Build a group from serial numbers, taking labels from connected drives
fn group_from_serials(
    api: &dyn StorageApi,
    name: String,
    master: &str,
    backups: &[String],
) -> GroupsResult<StorageGroupConfig> {
    let drives = DeviceEnumerator::new(api).list_drives();
    let slot = |serial: &str| -> GroupsResult<StorageDriveConfig> {
        let serial = serial.trim();
        if serial.is_empty() {
            return Err(GroupsError::Validation("Serial number cannot be empty".into()));
        }

        let label = match drives.iter().find(|d| d.serial_number.trim() == serial) {
            Some(drive) => drive.label.clone(),
            None => {
                warn!(
                    target: "cli",
                    "Drive {} is not connected; saving it without a label",
                    serial
                );
                String::new()
            }
        };
        Ok(StorageDriveConfig::new(label, serial))
    };

    let master = slot(master)?;
    let mut backup_slots: Vec<StorageDriveConfig> = Vec::new();
    for serial in backups {
        let backup = slot(serial)?;
        if backup.serial_number == master.serial_number
            || backup_slots.iter().any(|b| b.serial_number == backup.serial_number)
        {
            warn!(target: "cli", "Ignoring repeated backup {}", backup.serial_number);
            continue;
        }
        backup_slots.push(backup);
    }

    Ok(StorageGroupConfig::new(name.trim(), master, backup_slots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::enumerator::tests::usb_stick;
    use crate::devices::StorageTables;

    #[test]
    fn test_group_from_serials_uses_live_labels() {
        let mut tables = StorageTables::default();
        usb_stick(&mut tables, 1, "E:", "ABC123");

        let group = group_from_serials(
            &tables,
            " Photos ".into(),
            "ABC123",
            &["GONE".into()],
        )
        .unwrap();

        assert_eq!(group.display_name, "Photos");
        assert_eq!(group.master.label, "LABEL_ABC123");
        assert_eq!(group.backups.values().next().unwrap().label, "");
    }

    #[test]
    fn test_group_from_serials_drops_repeats() {
        let tables = StorageTables::default();
        let backups: Vec<String> = ["A", "M", "A", "B"].into_iter().map(String::from).collect();

        let group = group_from_serials(&tables, String::new(), "M", &backups).unwrap();
        assert_eq!(group.serials(), vec!["M", "A", "B"]);
    }

    #[test]
    fn test_blank_serial_rejected() {
        let tables = StorageTables::default();
        let err = group_from_serials(&tables, String::new(), "  ", &[]).unwrap_err();
        assert!(err.is_validation());
    }
}
