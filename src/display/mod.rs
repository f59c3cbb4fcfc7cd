//! Display formatting for terminal output
//!
//! Plain-text tables and selection lists for drives and storage groups.

pub mod drive;
pub mod group;

pub use drive::{format_drive_choices, format_drive_list};
pub use group::{format_group_details, format_group_list};
