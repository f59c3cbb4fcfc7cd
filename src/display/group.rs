//! Storage group display formatting
//!
//! A slot with no resolved drive letter is shown as unavailable.

use crate::models::{GroupId, GroupMap, StorageDriveConfig, StorageGroupConfig};

const UNAVAILABLE: &str = "unavailable";

fn status(slot: &StorageDriveConfig) -> &str {
    if slot.is_available() {
        &slot.drive_letter
    } else {
        UNAVAILABLE
    }
}

/// One line per group with its availability at a glance
pub fn format_group_list(groups: &GroupMap) -> String {
    if groups.is_empty() {
        return "No storage groups configured.".to_string();
    }

    let name_width = groups
        .iter()
        .map(|(id, g)| g.name_or_default(*id).len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<name_width$}  {:<14}  {}\n",
        "ID",
        "Name",
        "Master",
        "Backups",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:->4}  {:-<name_width$}  {:-<14}  {:-<7}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (id, group) in groups {
        let online = group.backups.values().filter(|b| b.is_available()).count();
        output.push_str(&format!(
            "{:>4}  {:<name_width$}  {:<14}  {}/{} available\n",
            id.to_string(),
            group.name_or_default(*id),
            status(&group.master),
            online,
            group.backups.len(),
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\n{} group(s)", groups.len()));
    output
}

/// Every slot of one group
pub fn format_group_details(id: GroupId, group: &StorageGroupConfig) -> String {
    let mut output = String::new();

    output.push_str(&format!("Group {}: {}\n", id, group.name_or_default(id)));
    for (role, slot) in group.slots() {
        output.push_str(&format!(
            "  {:<10} {:<16} {:<20} {}\n",
            role,
            if slot.label.is_empty() {
                "(no label)"
            } else {
                slot.label.as_str()
            },
            slot.serial_number,
            status(slot),
        ));
    }

    output
}
