//! Drive enumeration
//!
//! Joins physical disks, disk metadata, partitions, logical disks and
//! volumes into [`DriveRecord`]s. A missing join partner drops exactly that
//! leaf record; a failed whole-enumeration query yields no drives at all.

use log::{debug, trace};

use super::tables::{DiskMetadata, LogicalDiskRecord, PartitionRecord, PhysicalDisk, StorageApi};
use crate::error::GroupsResult;
use crate::models::{bytes_to_gb, is_removable_device, DriveRecord};

/// Produces drive snapshots from a storage API
pub struct DeviceEnumerator<'a> {
    api: &'a dyn StorageApi,
}

impl<'a> DeviceEnumerator<'a> {
    pub fn new(api: &'a dyn StorageApi) -> Self {
        Self { api }
    }

    /// List every drive currently visible, never failing
    ///
    /// Returns an empty list when the storage API is unavailable.
    pub fn list_drives(&self) -> Vec<DriveRecord> {
        match self.try_list_drives() {
            Ok(drives) => {
                debug!(target: "devices", "Enumerated {} drive(s)", drives.len());
                drives
            }
            Err(e) => {
                debug!(target: "devices", "Storage API unavailable, no drives: {}", e);
                Vec::new()
            }
        }
    }

    /// Drives that may be assigned to a storage group
    pub fn list_candidates(&self) -> Vec<DriveRecord> {
        self.list_drives()
            .into_iter()
            .filter(DriveRecord::is_group_candidate)
            .collect()
    }

    fn try_list_drives(&self) -> GroupsResult<Vec<DriveRecord>> {
        let disks = self.api.physical_disks()?;
        let mut drives = Vec::new();

        for disk in &disks {
            match self.drives_on_disk(disk) {
                Ok(mut found) => drives.append(&mut found),
                Err(e) => {
                    trace!(target: "devices", "Skipping disk {}: {}", disk.index, e);
                }
            }
        }

        Ok(drives)
    }

    fn drives_on_disk(&self, disk: &PhysicalDisk) -> GroupsResult<Vec<DriveRecord>> {
        let Some(meta) = self.api.disk_metadata(disk.index)? else {
            trace!(target: "devices", "Skipping disk {}: no disk metadata", disk.index);
            return Ok(Vec::new());
        };

        let partitions = self.api.partitions(disk)?;
        if partitions.is_empty() {
            trace!(target: "devices", "Skipping disk {}: no partitions", disk.index);
            return Ok(Vec::new());
        }

        let mut drives = Vec::new();
        for partition in &partitions {
            let logical_disks = match self.api.logical_disks(partition) {
                Ok(found) => found,
                Err(e) => {
                    trace!(target: "devices", "Skipping partition {}: {}", partition.device_id, e);
                    continue;
                }
            };

            if logical_disks.is_empty() {
                trace!(
                    target: "devices",
                    "Skipping partition {}: no logical disk",
                    partition.device_id
                );
                continue;
            }

            for logical in &logical_disks {
                match self.build_record(disk, &meta, partition, logical) {
                    Ok(Some(drive)) => drives.push(drive),
                    Ok(None) => {
                        trace!(
                            target: "devices",
                            "Skipping {}: no matching volume (not ready)",
                            logical.device_id
                        );
                    }
                    Err(e) => {
                        trace!(target: "devices", "Skipping {}: {}", logical.device_id, e);
                    }
                }
            }
        }

        Ok(drives)
    }

    fn build_record(
        &self,
        disk: &PhysicalDisk,
        meta: &DiskMetadata,
        partition: &PartitionRecord,
        logical: &LogicalDiskRecord,
    ) -> GroupsResult<Option<DriveRecord>> {
        let Some(volume) = self.api.volume(&logical.device_id)? else {
            return Ok(None);
        };

        let total = logical.size.unwrap_or(0);
        let free = logical.free_space.unwrap_or(0).min(total);
        let total_space_gb = bytes_to_gb(total);
        let free_space_gb = bytes_to_gb(free);

        let serial_number = first_non_blank(&meta.serial_number, &disk.serial_number)
            .trim()
            .to_string();
        let label = first_non_blank(&volume.file_system_label, &logical.volume_name).to_string();
        let partition_kind = first_non_blank(&meta.partition_style, &partition.kind).to_string();

        Ok(Some(DriveRecord {
            label,
            drive_letter: logical.device_id.clone(),
            disk_number: disk.index,
            manufacturer: meta.manufacturer.trim().to_string(),
            model: first_non_blank(&meta.model, &disk.model).trim().to_string(),
            serial_number,
            name: first_non_blank(&disk.caption, &disk.device_id).to_string(),
            file_system: first_non_blank(&volume.file_system, &logical.file_system).to_string(),
            partition_kind,
            total_space_gb,
            free_space_gb,
            used_space_gb: ((total_space_gb - free_space_gb) * 1000.0).round() / 1000.0,
            health_status: first_non_blank(&volume.health_status, &meta.health_status).to_string(),
            bus_type: meta.bus_type.clone(),
            interface_type: disk.interface_type.clone(),
            drive_type_code: logical.drive_type,
            is_removable: is_removable_device(
                logical.drive_type,
                &meta.bus_type,
                &disk.interface_type,
            ),
        }))
    }
}

fn first_non_blank<'s>(preferred: &'s str, fallback: &'s str) -> &'s str {
    if preferred.trim().is_empty() {
        fallback
    } else {
        preferred
    }
}
