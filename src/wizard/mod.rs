//! Storage group configuration wizard
//!
//! Walks the user through naming a group and choosing its master and backup
//! drives, for both new and existing groups.

pub mod machine;
pub mod runner;
pub mod steps;

pub use machine::{Transition, WizardInput, WizardMode, WizardState, WizardStep};
pub use runner::{ConfigWizard, WizardResult};
