//! Configuration module for storage groups
//!
//! This module provides configuration management including:
//! - Drive-root path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::GroupsPaths;
pub use settings::Settings;
