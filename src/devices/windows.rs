//! Windows storage snapshot via PowerShell and CIM
//!
//! One script collects every raw table and prints it as a single JSON
//! document in the [`StorageTables`] shape.

use std::process::Command;

use super::tables::StorageTables;
use crate::error::{GroupsError, GroupsResult};

const SNAPSHOT_SCRIPT: &str = r#"
$ErrorActionPreference = "Stop"
$disks = @(Get-CimInstance Win32_DiskDrive | ForEach-Object {
  [pscustomobject]@{
    Index = [uint32]$_.Index; DeviceId = [string]$_.DeviceID; Caption = [string]$_.Caption
    Model = [string]$_.Model; InterfaceType = [string]$_.InterfaceType
    SerialNumber = [string]$_.SerialNumber
  }
})
$meta = @(Get-Disk | ForEach-Object {
  [pscustomobject]@{
    Number = [uint32]$_.Number; Manufacturer = [string]$_.Manufacturer; Model = [string]$_.Model
    SerialNumber = [string]$_.SerialNumber; PartitionStyle = [string]$_.PartitionStyle
    BusType = [string]$_.BusType; HealthStatus = [string]$_.HealthStatus
  }
})
$partitions = @(Get-CimInstance Win32_DiskPartition | ForEach-Object {
  [pscustomobject]@{ DeviceId = [string]$_.DeviceID; DiskIndex = [uint32]$_.DiskIndex; Type = [string]$_.Type }
})
$logical = @(Get-CimInstance Win32_LogicalDiskToPartition | ForEach-Object {
  $ld = Get-CimInstance Win32_LogicalDisk -Filter "DeviceID='$($_.Dependent.DeviceID)'"
  if ($ld) {
    [pscustomobject]@{
      DeviceId = [string]$ld.DeviceID; PartitionId = [string]$_.Antecedent.DeviceID
      VolumeName = [string]$ld.VolumeName; FileSystem = [string]$ld.FileSystem
      Size = $ld.Size; FreeSpace = $ld.FreeSpace; DriveType = [uint32]$ld.DriveType
    }
  }
})
$volumes = @(Get-Volume | Where-Object { $_.DriveLetter } | ForEach-Object {
  [pscustomobject]@{
    DriveLetter = "$($_.DriveLetter):"; FileSystemLabel = [string]$_.FileSystemLabel
    FileSystem = [string]$_.FileSystem; HealthStatus = [string]$_.HealthStatus
  }
})
@{
  PhysicalDisks = $disks; DiskMetadata = $meta; Partitions = $partitions
  LogicalDisks = $logical; Volumes = $volumes
} | ConvertTo-Json -Depth 4 -Compress
"#;

/// Query the host for a full storage snapshot
pub fn query() -> GroupsResult<StorageTables> {
    let out = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", SNAPSHOT_SCRIPT])
        .output()
        .map_err(|e| GroupsError::Enumeration(format!("PowerShell failed: {}", e)))?;

    if !out.status.success() {
        return Err(GroupsError::Enumeration(
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }

    let raw = String::from_utf8_lossy(&out.stdout);
    if raw.trim().is_empty() {
        return Ok(StorageTables::default());
    }

    StorageTables::from_json(&raw)
}
