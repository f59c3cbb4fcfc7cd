//! Wizard steps
//!
//! Each step renders its own screen and interprets text answers. Back and
//! Cancel are handled by the state machine before a step sees any input.

pub mod backups;
pub mod display_name;
pub mod master;

pub use backups::BackupsStep;
pub use display_name::DisplayNameStep;
pub use master::MasterStep;

/// Parse a 1-based list choice into a 0-based index
pub(crate) fn parse_choice(text: &str, len: usize) -> Option<usize> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}
