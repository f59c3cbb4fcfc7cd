//! Device discovery
//!
//! Raw storage tables from the host (or a fixture) are joined into
//! normalized drive records by the [`DeviceEnumerator`].

pub mod enumerator;
#[cfg(target_os = "linux")]
pub mod linux;
pub mod snapshot;
pub mod tables;
#[cfg(windows)]
pub mod windows;

pub use enumerator::DeviceEnumerator;
pub use snapshot::{SnapshotSource, SnapshotStorageApi};
pub use tables::{
    DiskMetadata, LogicalDiskRecord, PartitionRecord, PhysicalDisk, StorageApi, StorageTables,
    VolumeRecord,
};
