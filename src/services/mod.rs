//! Service layer for storage groups
//!
//! Business rules on top of the store: duplicate detection, live status
//! resolution and the management menu.

pub mod duplicates;
pub mod manager;
pub mod status;

pub use duplicates::DuplicateValidator;
pub use manager::{GroupManager, MenuAction, MenuOutcome};
pub use status::StatusResolver;
