//! Wizard state machine
//!
//! States run `DisplayName -> SelectMaster -> SelectBackups -> Done`, with
//! Back and Cancel available from each of the first three. Transitions are
//! pure over the draft and the candidate list, so every path can be driven
//! without any I/O.

use std::fmt;

use crate::models::{DriveRecord, GroupId, StorageDriveConfig, StorageGroupConfig};

use super::steps::{BackupsStep, DisplayNameStep, MasterStep};

/// Add a new group or edit an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Add,
    Edit(GroupId),
}

impl WizardMode {
    pub fn group_id(&self) -> Option<GroupId> {
        match self {
            Self::Add => None,
            Self::Edit(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    DisplayName,
    SelectMaster,
    SelectBackups,
    Done,
    Cancelled,
}

impl WizardStep {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisplayName => write!(f, "DisplayName"),
            Self::SelectMaster => write!(f, "SelectMaster"),
            Self::SelectBackups => write!(f, "SelectBackups"),
            Self::Done => write!(f, "Done"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// One answer, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardInput {
    Text(String),
    Back,
    Cancel,
}

impl WizardInput {
    /// Classify a raw answer; no answer at all aborts
    pub fn parse(answer: Option<String>) -> Self {
        let Some(answer) = answer else {
            return Self::Cancel;
        };

        match answer.trim().to_lowercase().as_str() {
            "b" | "back" => Self::Back,
            "c" | "cancel" | "q" | "quit" => Self::Cancel,
            _ => Self::Text(answer.trim().to_string()),
        }
    }
}

/// Result of a single step's handling of text input
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub next: WizardStep,
    pub warnings: Vec<String>,
}

impl StepOutcome {
    pub fn advance(next: WizardStep) -> Self {
        Self {
            next,
            warnings: Vec::new(),
        }
    }

    pub fn stay(step: WizardStep, warning: impl Into<String>) -> Self {
        Self {
            next: step,
            warnings: vec![warning.into()],
        }
    }
}

/// What a transition did
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: WizardStep,
    pub to: WizardStep,
    pub warnings: Vec<String>,
}

/// Draft group plus the drives it may be built from
#[derive(Debug, Clone)]
pub struct WizardState {
    pub(crate) mode: WizardMode,
    pub(crate) step: WizardStep,
    pub(crate) default_name: String,
    /// Persisted name of the edited group; blank when adding
    pub(crate) current_name: String,
    pub(crate) display_name: String,
    pub(crate) candidates: Vec<DriveRecord>,
    pub(crate) master: Option<DriveRecord>,
    pub(crate) backups: Vec<DriveRecord>,
    /// Slots of the edited group, kept when a step is left blank
    pub(crate) current_master: Option<DriveRecord>,
    pub(crate) current_backups: Vec<DriveRecord>,
}

impl WizardState {
    /// Start a wizard for a new group with the given id
    pub fn for_add(next_id: GroupId, candidates: Vec<DriveRecord>) -> Self {
        Self {
            mode: WizardMode::Add,
            step: WizardStep::DisplayName,
            default_name: crate::models::default_display_name(next_id),
            current_name: String::new(),
            display_name: String::new(),
            candidates,
            master: None,
            backups: Vec::new(),
            current_master: None,
            current_backups: Vec::new(),
        }
    }

    /// Start a wizard preloaded from an existing group
    pub fn for_edit(
        id: GroupId,
        existing: &StorageGroupConfig,
        candidates: Vec<DriveRecord>,
    ) -> Self {
        let current_master = slot_record(&existing.master, &candidates);
        let current_backups = existing
            .backups
            .values()
            .filter_map(|b| slot_record(b, &candidates))
            .collect();

        Self {
            mode: WizardMode::Edit(id),
            step: WizardStep::DisplayName,
            default_name: existing.name_or_default(id),
            current_name: existing.display_name.trim().to_string(),
            display_name: String::new(),
            candidates,
            master: None,
            backups: Vec::new(),
            current_master,
            current_backups,
        }
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn candidates(&self) -> &[DriveRecord] {
        &self.candidates
    }

    pub fn master(&self) -> Option<&DriveRecord> {
        self.master.as_ref()
    }

    pub fn backups(&self) -> &[DriveRecord] {
        &self.backups
    }

    /// Candidates offered as backups: everything but the chosen master
    pub fn backup_options(&self) -> Vec<&DriveRecord> {
        let master_serial = self.master.as_ref().map(|m| m.serial_number.trim());
        self.candidates
            .iter()
            .filter(|d| Some(d.serial_number.trim()) != master_serial)
            .collect()
    }

    /// Apply one input and move to the next state
    pub fn transition(&mut self, input: WizardInput) -> Transition {
        let from = self.step;

        let outcome = match (from, input) {
            (WizardStep::Done | WizardStep::Cancelled, _) => StepOutcome::advance(from),
            (_, WizardInput::Cancel) => StepOutcome::advance(WizardStep::Cancelled),
            (WizardStep::DisplayName, WizardInput::Back) => {
                StepOutcome::advance(WizardStep::DisplayName)
            }
            (WizardStep::SelectMaster, WizardInput::Back) => {
                StepOutcome::advance(WizardStep::DisplayName)
            }
            (WizardStep::SelectBackups, WizardInput::Back) => {
                self.backups.clear();
                StepOutcome::advance(WizardStep::SelectMaster)
            }
            (WizardStep::DisplayName, WizardInput::Text(text)) => {
                DisplayNameStep::apply(self, &text)
            }
            (WizardStep::SelectMaster, WizardInput::Text(text)) => MasterStep::apply(self, &text),
            (WizardStep::SelectBackups, WizardInput::Text(text)) => {
                BackupsStep::apply(self, &text)
            }
        };

        self.step = outcome.next;
        Transition {
            from,
            to: outcome.next,
            warnings: outcome.warnings,
        }
    }

    /// The group described by a finished draft
    ///
    /// Returns None unless the wizard reached Done with a master selected.
    pub fn build_group(&self) -> Option<StorageGroupConfig> {
        if self.step != WizardStep::Done {
            return None;
        }
        let master = self.master.as_ref()?;

        Some(StorageGroupConfig::new(
            self.display_name.clone(),
            StorageDriveConfig::new(master.label.clone(), master.serial_number.trim()),
            self.backups.iter().map(|b| {
                StorageDriveConfig::new(b.label.clone(), b.serial_number.trim())
            }),
        ))
    }
}

/// The live drive for a persisted slot, or a bare record when it is not connected
fn slot_record(slot: &StorageDriveConfig, candidates: &[DriveRecord]) -> Option<DriveRecord> {
    let serial = slot.serial();
    if serial.is_empty() {
        return None;
    }

    let record = candidates
        .iter()
        .find(|d| d.serial_number.trim() == serial)
        .cloned()
        .unwrap_or_else(|| DriveRecord {
            label: slot.label.clone(),
            serial_number: serial.to_string(),
            ..DriveRecord::default()
        });
    Some(record)
}
