//! Storage groups - master/backup drive group configuration
//!
//! This library discovers removable drives, lets the user arrange them into
//! named groups of one master and any number of backups, and persists those
//! groups in a JSON file on the drive itself. Drives are identified by serial
//! number; their current drive letter is resolved on every load.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Drive root, file paths and settings
//! - `error`: Custom error types
//! - `models`: Drive records, groups and their ids
//! - `devices`: Host storage queries and the drive enumerator
//! - `storage`: JSON group file with renumbering writes
//! - `audit`: Journal of committed group changes, slot by slot
//! - `prompt`: Console and scripted answer sources
//! - `services`: Duplicate detection, status resolution, management menu
//! - `wizard`: Add/edit wizard state machine
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `sgroups` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use storage_groups::config::GroupsPaths;
//! use storage_groups::devices::SnapshotStorageApi;
//! use storage_groups::prompt::Prompter;
//! use storage_groups::storage::GroupStore;
//! use storage_groups::wizard::{ConfigWizard, WizardMode};
//!
//! let store = GroupStore::new(GroupsPaths::new(None)?);
//! let api = SnapshotStorageApi::from_fixture(None);
//! ConfigWizard::new(&store, &api).run(WizardMode::Add, &mut Prompter::console(false))?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod devices;
pub mod display;
pub mod error;
pub mod models;
pub mod prompt;
pub mod services;
pub mod storage;
pub mod wizard;

pub use error::{GroupsError, GroupsResult};
