//! Linux storage snapshot via lsblk JSON
//!
//! lsblk reports a disk/partition tree. It is flattened into the same raw
//! tables the Windows query produces; the mount point stands in for the
//! drive letter.

use std::process::Command;

use serde_json::Value;

use super::tables::{
    DiskMetadata, LogicalDiskRecord, PartitionRecord, PhysicalDisk, StorageTables, VolumeRecord,
};
use crate::error::{GroupsError, GroupsResult};
use crate::models::DRIVE_TYPE_REMOVABLE;

const DRIVE_TYPE_FIXED: u32 = 3;

const LSBLK_COLUMNS: &str =
    "NAME,PATH,TYPE,SIZE,FSTYPE,FSAVAIL,LABEL,MOUNTPOINT,MODEL,VENDOR,SERIAL,TRAN,RM,HOTPLUG,PTTYPE,STATE";

/// Query the host for a full storage snapshot
pub fn query() -> GroupsResult<StorageTables> {
    let out = Command::new("lsblk")
        .args(["-J", "-b", "-o", LSBLK_COLUMNS])
        .output()
        .map_err(|e| GroupsError::Enumeration(format!("lsblk failed: {}", e)))?;

    if !out.status.success() {
        return Err(GroupsError::Enumeration(
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }

    let value: Value = serde_json::from_slice(&out.stdout)
        .map_err(|e| GroupsError::Enumeration(format!("lsblk JSON parse error: {}", e)))?;

    Ok(parse_lsblk(&value))
}

/// Flatten lsblk's device tree into raw tables
pub fn parse_lsblk(value: &Value) -> StorageTables {
    let mut tables = StorageTables::default();

    let devices = value
        .get("blockdevices")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let disks = devices
        .iter()
        .filter(|d| str_field(d, "type") == "disk");

    for (index, disk) in disks.enumerate() {
        let index = index as u32;
        let removable = bool_field(disk, "rm") || bool_field(disk, "hotplug");
        let transport = str_field(disk, "tran").to_uppercase();
        let serial = str_field(disk, "serial").trim().to_string();
        let model = str_field(disk, "model").trim().to_string();

        tables.physical_disks.push(PhysicalDisk {
            index,
            device_id: device_path(disk),
            caption: model.clone(),
            model: model.clone(),
            interface_type: transport.clone(),
            serial_number: serial.clone(),
        });

        tables.disk_metadata.push(DiskMetadata {
            number: index,
            manufacturer: str_field(disk, "vendor").trim().to_string(),
            model,
            serial_number: serial,
            partition_style: str_field(disk, "pttype").to_uppercase(),
            bus_type: transport,
            health_status: health(disk),
        });

        let children: Vec<&Value> = disk
            .get("children")
            .and_then(|v| v.as_array())
            .map(|c| c.iter().filter(|p| str_field(p, "type") == "part").collect())
            .unwrap_or_default();

        // Superfloppy layout: a filesystem directly on the disk
        let partitions = if children.is_empty() && !str_field(disk, "fstype").is_empty() {
            vec![disk]
        } else {
            children
        };

        let drive_type = if removable {
            DRIVE_TYPE_REMOVABLE
        } else {
            DRIVE_TYPE_FIXED
        };

        for part in partitions {
            push_partition(&mut tables, index, part, drive_type);
        }
    }

    tables
}

fn push_partition(tables: &mut StorageTables, disk_index: u32, part: &Value, drive_type: u32) {
    let partition_id = device_path(part);
    tables.partitions.push(PartitionRecord {
        device_id: partition_id.clone(),
        disk_index,
        kind: str_field(part, "fstype").to_string(),
    });

    let mount_point = str_field(part, "mountpoint");
    if mount_point.is_empty() {
        return;
    }

    let label = str_field(part, "label").to_string();
    let file_system = str_field(part, "fstype").to_string();

    tables.logical_disks.push(LogicalDiskRecord {
        device_id: mount_point.to_string(),
        partition_id,
        volume_name: label.clone(),
        file_system: file_system.clone(),
        size: u64_field(part, "size"),
        free_space: u64_field(part, "fsavail"),
        drive_type,
    });

    tables.volumes.push(VolumeRecord {
        drive_letter: mount_point.to_string(),
        file_system_label: label,
        file_system,
        health_status: health(part),
    });
}

fn device_path(value: &Value) -> String {
    let path = str_field(value, "path");
    if path.is_empty() {
        format!("/dev/{}", str_field(value, "name"))
    } else {
        path.to_string()
    }
}

fn health(value: &Value) -> String {
    match str_field(value, "state") {
        "" | "running" | "live" => "Healthy".to_string(),
        other => other.to_string(),
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Older lsblk releases print numbers and flags as strings
fn u64_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_field(value: &Value, key: &str) -> bool {
    match value.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        _ => false,
    }
}
