//! Storage API backed by a freshly captured snapshot
//!
//! Each call to `physical_disks` captures a new snapshot from the source
//! (the host, or a JSON fixture) and the per-item lookups answer from it.

use std::cell::RefCell;
use std::path::PathBuf;

use super::tables::{
    DiskMetadata, LogicalDiskRecord, PartitionRecord, PhysicalDisk, StorageApi, StorageTables,
    VolumeRecord,
};
use crate::error::{GroupsError, GroupsResult};

/// Where snapshots come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    /// The host OS storage API
    Host,
    /// A JSON fixture file in the `StorageTables` shape
    Fixture(PathBuf),
}

impl SnapshotSource {
    fn capture(&self) -> GroupsResult<StorageTables> {
        match self {
            Self::Host => query_host(),
            Self::Fixture(path) => StorageTables::from_file(path),
        }
    }
}

#[cfg(windows)]
fn query_host() -> GroupsResult<StorageTables> {
    super::windows::query()
}

#[cfg(target_os = "linux")]
fn query_host() -> GroupsResult<StorageTables> {
    super::linux::query()
}

#[cfg(not(any(windows, target_os = "linux")))]
fn query_host() -> GroupsResult<StorageTables> {
    Err(GroupsError::Enumeration(
        "Storage enumeration is not supported on this platform".into(),
    ))
}

/// Storage API that re-captures its snapshot on every enumeration
pub struct SnapshotStorageApi {
    source: SnapshotSource,
    snapshot: RefCell<Option<StorageTables>>,
}

impl SnapshotStorageApi {
    pub fn new(source: SnapshotSource) -> Self {
        Self {
            source,
            snapshot: RefCell::new(None),
        }
    }

    /// Pick the fixture when one is configured, the host otherwise
    pub fn from_fixture(fixture: Option<PathBuf>) -> Self {
        Self::new(match fixture {
            Some(path) => SnapshotSource::Fixture(path),
            None => SnapshotSource::Host,
        })
    }

    pub fn source(&self) -> &SnapshotSource {
        &self.source
    }

    fn with_snapshot<T>(
        &self,
        f: impl FnOnce(&StorageTables) -> GroupsResult<T>,
    ) -> GroupsResult<T> {
        match self.snapshot.borrow().as_ref() {
            Some(tables) => f(tables),
            None => Err(GroupsError::Enumeration(
                "No storage snapshot captured".into(),
            )),
        }
    }
}

impl StorageApi for SnapshotStorageApi {
    fn physical_disks(&self) -> GroupsResult<Vec<PhysicalDisk>> {
        self.snapshot.replace(None);
        let tables = self.source.capture()?;
        let disks = tables.physical_disks()?;
        self.snapshot.replace(Some(tables));
        Ok(disks)
    }

    fn disk_metadata(&self, disk_index: u32) -> GroupsResult<Option<DiskMetadata>> {
        self.with_snapshot(|t| t.disk_metadata(disk_index))
    }

    fn partitions(&self, disk: &PhysicalDisk) -> GroupsResult<Vec<PartitionRecord>> {
        self.with_snapshot(|t| t.partitions(disk))
    }

    fn logical_disks(&self, partition: &PartitionRecord) -> GroupsResult<Vec<LogicalDiskRecord>> {
        self.with_snapshot(|t| t.logical_disks(partition))
    }

    fn volume(&self, drive_letter: &str) -> GroupsResult<Option<VolumeRecord>> {
        self.with_snapshot(|t| t.volume(drive_letter))
    }
}
