//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod drives;
pub mod groups;
pub mod history;

pub use drives::handle_drives_command;
pub use groups::{
    handle_add_command, handle_edit_command, handle_list_command, handle_manage_command,
    handle_remove_command, AddArgs,
};
pub use history::handle_history_command;
