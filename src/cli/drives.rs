//! Drive CLI commands
//!
//! Lists what the device enumerator currently sees.

use crate::devices::{DeviceEnumerator, StorageApi};
use crate::display::format_drive_list;
use crate::error::GroupsResult;

/// Print enumerated drives; only group candidates unless `all`
pub fn handle_drives_command(api: &dyn StorageApi, all: bool) -> GroupsResult<()> {
    let enumerator = DeviceEnumerator::new(api);
    let drives = if all {
        enumerator.list_drives()
    } else {
        enumerator.list_candidates()
    };

    println!("{}", format_drive_list(&drives));
    Ok(())
}
