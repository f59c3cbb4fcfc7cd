//! Raw storage records and the lookups the enumerator joins them with
//!
//! The records mirror what the host storage API reports: physical disks,
//! per-disk metadata, partitions, logical disks and volumes. A
//! [`StorageTables`] snapshot answers every lookup in memory, so live
//! queries and JSON fixtures share one code path.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GroupsError, GroupsResult};

/// A physical disk as seen by the OS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PhysicalDisk {
    pub index: u32,
    pub device_id: String,
    pub caption: String,
    pub model: String,
    pub interface_type: String,
    pub serial_number: String,
}

/// Storage-subsystem metadata for a disk, keyed by disk number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DiskMetadata {
    pub number: u32,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub partition_style: String,
    pub bus_type: String,
    pub health_status: String,
}

/// A partition on a disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PartitionRecord {
    pub device_id: String,
    pub disk_index: u32,
    #[serde(rename = "Type")]
    pub kind: String,
}

/// A logical disk (mounted filesystem) backed by a partition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LogicalDiskRecord {
    /// Drive letter ("E:") or mount point
    pub device_id: String,
    pub partition_id: String,
    pub volume_name: String,
    pub file_system: String,
    pub size: Option<u64>,
    pub free_space: Option<u64>,
    pub drive_type: u32,
}

/// A volume, keyed by drive letter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VolumeRecord {
    pub drive_letter: String,
    pub file_system_label: String,
    pub file_system: String,
    pub health_status: String,
}

/// Lookups over the host storage API
///
/// `physical_disks` is the whole-enumeration query; its failure means no
/// drives at all. The other lookups are per item and their failures only
/// drop that item.
pub trait StorageApi {
    fn physical_disks(&self) -> GroupsResult<Vec<PhysicalDisk>>;

    fn disk_metadata(&self, disk_index: u32) -> GroupsResult<Option<DiskMetadata>>;

    fn partitions(&self, disk: &PhysicalDisk) -> GroupsResult<Vec<PartitionRecord>>;

    fn logical_disks(&self, partition: &PartitionRecord) -> GroupsResult<Vec<LogicalDiskRecord>>;

    fn volume(&self, drive_letter: &str) -> GroupsResult<Option<VolumeRecord>>;
}

/// One consistent snapshot of every raw table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StorageTables {
    #[serde(deserialize_with = "one_or_many")]
    pub physical_disks: Vec<PhysicalDisk>,
    #[serde(deserialize_with = "one_or_many")]
    pub disk_metadata: Vec<DiskMetadata>,
    #[serde(deserialize_with = "one_or_many")]
    pub partitions: Vec<PartitionRecord>,
    #[serde(deserialize_with = "one_or_many")]
    pub logical_disks: Vec<LogicalDiskRecord>,
    #[serde(deserialize_with = "one_or_many")]
    pub volumes: Vec<VolumeRecord>,
}

impl StorageTables {
    /// Parse a snapshot from JSON text
    pub fn from_json(raw: &str) -> GroupsResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| GroupsError::Enumeration(format!("Invalid storage snapshot: {}", e)))
    }

    /// Load a snapshot from a JSON fixture file
    pub fn from_file(path: &Path) -> GroupsResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GroupsError::Enumeration(format!(
                "Failed to read device fixture {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&raw)
    }
}

impl StorageApi for StorageTables {
    fn physical_disks(&self) -> GroupsResult<Vec<PhysicalDisk>> {
        Ok(self.physical_disks.clone())
    }

    fn disk_metadata(&self, disk_index: u32) -> GroupsResult<Option<DiskMetadata>> {
        Ok(self
            .disk_metadata
            .iter()
            .find(|m| m.number == disk_index)
            .cloned())
    }

    fn partitions(&self, disk: &PhysicalDisk) -> GroupsResult<Vec<PartitionRecord>> {
        Ok(self
            .partitions
            .iter()
            .filter(|p| p.disk_index == disk.index)
            .cloned()
            .collect())
    }

    fn logical_disks(&self, partition: &PartitionRecord) -> GroupsResult<Vec<LogicalDiskRecord>> {
        Ok(self
            .logical_disks
            .iter()
            .filter(|l| l.partition_id == partition.device_id)
            .cloned()
            .collect())
    }

    fn volume(&self, drive_letter: &str) -> GroupsResult<Option<VolumeRecord>> {
        Ok(self
            .volumes
            .iter()
            .find(|v| v.drive_letter.eq_ignore_ascii_case(drive_letter))
            .cloned())
    }
}

/// PowerShell collapses one-element arrays into a bare object
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
        OneOrMany::Null(()) => Vec::new(),
    })
}
