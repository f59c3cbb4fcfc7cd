//! Storage layer for storage groups
//!
//! The group file is the single source of truth and is only ever replaced
//! whole. The in-memory map is always re-derived from it.

pub mod file_io;
pub mod groups;

pub use file_io::{read_optional, replace_file};
pub use groups::{load_groups, next_group_id, write_groups, GroupStore};
