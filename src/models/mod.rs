//! Core data models for storage groups
//!
//! Enumerated drives, persisted groups and their slots, and the numeric
//! keys that identify them.

pub mod drive;
pub mod group;
pub mod ids;

pub use drive::{bytes_to_gb, is_removable_device, DriveRecord, DRIVE_TYPE_REMOVABLE};
pub use group::{default_display_name, GroupMap, StorageDriveConfig, StorageGroupConfig};
pub use ids::{GroupId, SlotKey};
