//! Backup drive selection step

use crate::display::format_drive_choices;
use crate::models::DriveRecord;
use crate::wizard::machine::{StepOutcome, WizardState, WizardStep};

use super::parse_choice;

const NONE_TOKENS: [&str; 2] = ["none", "-"];

pub struct BackupsStep;

impl BackupsStep {
    pub fn screen(state: &WizardState) -> Vec<String> {
        let mut lines = vec![String::new(), "Step 3/3: Select backup drives".to_string()];

        let options = state.backup_options();
        if options.is_empty() {
            lines.push("  No other eligible drives are connected.".into());
        } else {
            let marked: Vec<&str> = state
                .current_backups
                .iter()
                .map(|d| d.serial_number.trim())
                .collect();
            lines.push(format_drive_choices(&options, &marked));
        }

        if !state.current_backups.is_empty() {
            let current: Vec<String> = state
                .current_backups
                .iter()
                .map(|d| format!("{} [{}]", d.label, d.serial_number))
                .collect();
            lines.push(format!("  Current backups: {}", current.join(", ")));
        }
        lines
    }

    pub fn prompt(state: &WizardState) -> String {
        if state.current_backups.is_empty() {
            "Backup drives (comma-separated numbers, blank for none): ".to_string()
        } else {
            "Backup drives (comma-separated numbers, blank keeps current, 'none' to clear): "
                .to_string()
        }
    }

    /// Parse a comma-separated selection
    ///
    /// Any number outside the list keeps the step open. A drive chosen more
    /// than once is kept once with a warning.
    pub fn apply(state: &mut WizardState, text: &str) -> StepOutcome {
        let text = text.trim();

        if text.is_empty() {
            let master = state
                .master
                .as_ref()
                .map(|m| m.serial_number.trim().to_string());
            state.backups = state
                .current_backups
                .iter()
                .filter(|d| Some(d.serial_number.trim().to_string()) != master)
                .cloned()
                .collect();
            return StepOutcome::advance(WizardStep::Done);
        }

        if NONE_TOKENS.contains(&text.to_lowercase().as_str()) {
            state.backups.clear();
            return StepOutcome::advance(WizardStep::Done);
        }

        let options: Vec<DriveRecord> = state.backup_options().into_iter().cloned().collect();
        let mut selected: Vec<DriveRecord> = Vec::new();
        let mut warnings = Vec::new();

        for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let Some(index) = parse_choice(token, options.len()) else {
                let message = if options.is_empty() {
                    "No other eligible drives are connected".to_string()
                } else {
                    format!(
                        "'{}' is not a drive number between 1 and {}",
                        token,
                        options.len()
                    )
                };
                return StepOutcome::stay(WizardStep::SelectBackups, message);
            };

            let drive = &options[index];
            if selected.iter().any(|d| d.serial_number == drive.serial_number) {
                warnings.push(format!(
                    "Drive {} ({}) was selected more than once; keeping it once",
                    token, drive.serial_number
                ));
                continue;
            }
            selected.push(drive.clone());
        }

        state.backups = selected;
        StepOutcome {
            next: WizardStep::Done,
            warnings,
        }
    }
}
