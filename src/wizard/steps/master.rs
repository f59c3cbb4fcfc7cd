//! Master drive selection step

use crate::display::format_drive_choices;
use crate::models::DriveRecord;
use crate::wizard::machine::{StepOutcome, WizardState, WizardStep};

use super::parse_choice;

pub struct MasterStep;

impl MasterStep {
    pub fn screen(state: &WizardState) -> Vec<String> {
        let mut lines = vec![String::new(), "Step 2/3: Select the master drive".to_string()];

        if state.candidates().is_empty() {
            lines.push("  No eligible drives are connected.".into());
        } else {
            let drives: Vec<&DriveRecord> = state.candidates().iter().collect();
            let marked: Vec<&str> = state
                .current_master
                .iter()
                .map(|d| d.serial_number.trim())
                .collect();
            lines.push(format_drive_choices(&drives, &marked));
        }

        if let Some(current) = &state.current_master {
            lines.push(format!(
                "  Current master: {} [{}]",
                current.label, current.serial_number
            ));
        }
        lines
    }

    pub fn prompt(state: &WizardState) -> String {
        match state.candidates().len() {
            0 => "Master drive (b=back, c=cancel): ".to_string(),
            n if state.current_master.is_some() => {
                format!("Master drive [1-{}, blank keeps current]: ", n)
            }
            n => format!("Master drive [1-{}]: ", n),
        }
    }

    /// A number picks a candidate; blank keeps the edited group's master
    pub fn apply(state: &mut WizardState, text: &str) -> StepOutcome {
        let text = text.trim();

        if text.is_empty() {
            return match state.current_master.clone() {
                Some(current) => {
                    state.master = Some(current);
                    StepOutcome::advance(WizardStep::SelectBackups)
                }
                None => StepOutcome::stay(WizardStep::SelectMaster, "A master drive is required"),
            };
        }

        match parse_choice(text, state.candidates().len()) {
            Some(index) => {
                state.master = Some(state.candidates[index].clone());
                StepOutcome::advance(WizardStep::SelectBackups)
            }
            None if state.candidates().is_empty() => StepOutcome::stay(
                WizardStep::SelectMaster,
                "No eligible drives are connected",
            ),
            None => StepOutcome::stay(
                WizardStep::SelectMaster,
                format!(
                    "'{}' is not a drive number between 1 and {}",
                    text,
                    state.candidates().len()
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupId;
    use crate::wizard::machine::tests::drive;

    fn state() -> WizardState {
        WizardState::for_add(GroupId::FIRST, vec![drive("A1", "E:"), drive("B2", "F:")])
    }

    #[test]
    fn test_pick_by_number() {
        let mut state = state();
        let outcome = MasterStep::apply(&mut state, "2");

        assert_eq!(outcome.next, WizardStep::SelectBackups);
        assert_eq!(state.master().unwrap().serial_number, "B2");
    }

    #[test]
    fn test_invalid_choice_stays_with_warning() {
        for answer in ["0", "3", "x", ""] {
            let mut state = state();
            let outcome = MasterStep::apply(&mut state, answer);

            assert_eq!(outcome.next, WizardStep::SelectMaster);
            assert_eq!(outcome.warnings.len(), 1);
            assert!(state.master().is_none());
        }
    }

    #[test]
    fn test_no_candidates() {
        let mut state = WizardState::for_add(GroupId::FIRST, Vec::new());
        let outcome = MasterStep::apply(&mut state, "1");
        assert_eq!(
            outcome.warnings,
            vec!["No eligible drives are connected".to_string()]
        );
        assert!(MasterStep::screen(&state)
            .iter()
            .any(|l| l.contains("No eligible drives")));
    }
}
