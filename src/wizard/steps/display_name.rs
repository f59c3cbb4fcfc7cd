//! Display name step

use crate::wizard::machine::{StepOutcome, WizardMode, WizardState, WizardStep};

pub struct DisplayNameStep;

impl DisplayNameStep {
    pub fn screen(state: &WizardState) -> Vec<String> {
        let title = match state.mode() {
            WizardMode::Add => "Step 1/3: Name the new storage group".to_string(),
            WizardMode::Edit(id) => format!("Step 1/3: Rename storage group {}", id),
        };
        vec![
            String::new(),
            title,
            "Enter 'b' to go back or 'c' to cancel at any step.".into(),
        ]
    }

    pub fn prompt(state: &WizardState) -> String {
        format!("Display name [{}]: ", state.default_name())
    }

    /// Blank keeps the current name, which stays blank for a new group
    ///
    /// A blank name is shown as "Storage Group <id>" for whatever id the
    /// group has at display time.
    pub fn apply(state: &mut WizardState, text: &str) -> StepOutcome {
        let name = text.trim();
        state.display_name = if name.is_empty() {
            state.current_name.clone()
        } else {
            name.to_string()
        };

        StepOutcome::advance(WizardStep::SelectMaster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, StorageDriveConfig, StorageGroupConfig};

    #[test]
    fn test_name_is_trimmed() {
        let mut state = WizardState::for_add(GroupId::FIRST, Vec::new());
        let outcome = DisplayNameStep::apply(&mut state, "  Photos ");

        assert_eq!(outcome, StepOutcome::advance(WizardStep::SelectMaster));
        assert_eq!(state.display_name(), "Photos");
    }

    #[test]
    fn test_blank_name_keeps_persisted_name_on_edit() {
        let unnamed = StorageGroupConfig::new("", StorageDriveConfig::new("M", "S1"), vec![]);
        let mut state = WizardState::for_edit(GroupId::new(2).unwrap(), &unnamed, Vec::new());
        DisplayNameStep::apply(&mut state, "");
        assert_eq!(state.display_name(), "");

        let named = StorageGroupConfig::new("Music", StorageDriveConfig::new("M", "S1"), vec![]);
        let mut state = WizardState::for_edit(GroupId::new(2).unwrap(), &named, Vec::new());
        DisplayNameStep::apply(&mut state, "  ");
        assert_eq!(state.display_name(), "Music");
    }

    #[test]
    fn test_prompt_shows_default() {
        let state = WizardState::for_add(GroupId::new(3).unwrap(), Vec::new());
        assert_eq!(
            DisplayNameStep::prompt(&state),
            "Display name [Storage Group 3]: "
        );
    }
}
