//! Wizard orchestration
//!
//! Drives the state machine from a [`Prompter`], then commits the finished
//! draft: duplicate check, write, reload and status refresh, in that order.

use log::{debug, info, trace};

use crate::devices::{DeviceEnumerator, StorageApi};
use crate::error::{GroupsError, GroupsResult};
use crate::models::{DriveRecord, GroupId, GroupMap, StorageGroupConfig};
use crate::prompt::Prompter;
use crate::services::DuplicateValidator;
use crate::storage::{next_group_id, GroupStore};

use super::machine::{WizardInput, WizardMode, WizardState, WizardStep};
use super::steps::{BackupsStep, DisplayNameStep, MasterStep};

/// Result of running the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardResult {
    /// Whether a group was actually written
    pub completed: bool,
    /// Id of the written group after renumbering
    pub group_id: Option<GroupId>,
}

impl WizardResult {
    fn saved(id: GroupId) -> Self {
        Self {
            completed: true,
            group_id: Some(id),
        }
    }

    fn not_saved() -> Self {
        Self {
            completed: false,
            group_id: None,
        }
    }
}

/// Creates or edits one storage group
pub struct ConfigWizard<'a> {
    store: &'a GroupStore,
    api: &'a dyn StorageApi,
}

impl<'a> ConfigWizard<'a> {
    pub fn new(store: &'a GroupStore, api: &'a dyn StorageApi) -> Self {
        Self { store, api }
    }

    /// Run the wizard to completion or cancellation
    ///
    /// Cancel, Back past the last screen and declined duplicates all return a
    /// result with `completed == false`. Editing an unknown group and any
    /// persistence failure are errors.
    pub fn run(&self, mode: WizardMode, prompter: &mut Prompter) -> GroupsResult<WizardResult> {
        let groups = self.store.groups()?;
        let drives = DeviceEnumerator::new(self.api).list_candidates();
        let candidates = Self::candidates(&groups, drives, mode.group_id());

        let mut state = match mode {
            WizardMode::Add => WizardState::for_add(next_group_id(&groups), candidates),
            WizardMode::Edit(id) => {
                let existing = groups
                    .get(&id)
                    .ok_or_else(|| GroupsError::group_not_found(id.to_string()))?;
                WizardState::for_edit(id, existing, candidates)
            }
        };

        info!(
            target: "wizard",
            "Starting {:?} wizard with {} candidate drive(s)",
            mode,
            state.candidates().len()
        );

        while !state.step().is_finished() {
            let (screen, prompt) = Self::render(&state);
            for line in screen {
                prompter.say(line);
            }

            let input = WizardInput::parse(prompter.ask(&prompt)?);
            let transition = state.transition(input);
            debug!(target: "wizard", "{} -> {}", transition.from, transition.to);

            for warning in &transition.warnings {
                prompter.say(format!("Warning: {}", warning));
            }
        }

        if state.step() == WizardStep::Cancelled {
            info!(target: "wizard", "Wizard cancelled");
            prompter.say("Cancelled. No changes made.");
            return Ok(WizardResult::not_saved());
        }

        let group = state
            .build_group()
            .ok_or_else(|| GroupsError::Validation("A master drive is required".into()))?;

        self.commit(mode, group, prompter)
    }

    /// Validate and persist a finished group, then refresh live status
    pub fn commit(
        &self,
        mode: WizardMode,
        group: StorageGroupConfig,
        prompter: &mut Prompter,
    ) -> GroupsResult<WizardResult> {
        let groups = self.store.groups()?;
        if let WizardMode::Edit(id) = mode {
            if !groups.contains_key(&id) {
                return Err(GroupsError::group_not_found(id.to_string()));
            }
        }

        let serials = group.serials();
        if !DuplicateValidator::check(&groups, &serials, mode.group_id(), prompter)? {
            prompter.say("Operation cancelled. No changes made.");
            return Ok(WizardResult::not_saved());
        }

        let id = self.store.save_group(mode.group_id(), group)?;
        let name = self
            .store
            .get(id)?
            .map(|saved| saved.name_or_default(id))
            .unwrap_or_default();

        let drives = DeviceEnumerator::new(self.api).list_drives();
        self.store.refresh_status(&drives)?;

        info!(target: "wizard", "Saved storage group {} ({})", id, name);
        prompter.say(format!("Saved storage group {}: {}", id, name));

        Ok(WizardResult::saved(id))
    }

    /// Drives the draft may use
    ///
    /// Drives without a serial cannot be matched later and are left out, as
    /// are drives already assigned to any group other than `editing`.
    pub fn candidates(
        groups: &GroupMap,
        drives: Vec<DriveRecord>,
        editing: Option<GroupId>,
    ) -> Vec<DriveRecord> {
        let assigned: Vec<String> = groups
            .iter()
            .filter(|(id, _)| Some(**id) != editing)
            .flat_map(|(_, group)| group.serials())
            .collect();

        drives
            .into_iter()
            .filter(|drive| {
                if !drive.is_group_candidate() {
                    return false;
                }
                if !drive.has_serial() {
                    trace!(target: "wizard", "Skipping {}: no serial number", drive.drive_letter);
                    return false;
                }
                let serial = drive.serial_number.trim();
                if assigned.iter().any(|s| s == serial) {
                    trace!(target: "wizard", "Skipping {}: already assigned", serial);
                    return false;
                }
                true
            })
            .collect()
    }

    fn render(state: &WizardState) -> (Vec<String>, String) {
        match state.step() {
            WizardStep::DisplayName => (
                DisplayNameStep::screen(state),
                DisplayNameStep::prompt(state),
            ),
            WizardStep::SelectMaster => (MasterStep::screen(state), MasterStep::prompt(state)),
            WizardStep::SelectBackups => (BackupsStep::screen(state), BackupsStep::prompt(state)),
            WizardStep::Done | WizardStep::Cancelled => (Vec::new(), String::new()),
        }
    }
}
