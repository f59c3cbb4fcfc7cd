//! Change history command

use crate::audit::ChangeJournal;
use crate::error::GroupsResult;

/// Print the most recent group changes, oldest first
pub fn handle_history_command(journal: &ChangeJournal, count: usize) -> GroupsResult<()> {
    let changes = journal.recent(count)?;
    if changes.is_empty() {
        println!("No changes recorded.");
        return Ok(());
    }

    for change in changes {
        println!("{}", change.describe());
    }
    Ok(())
}
