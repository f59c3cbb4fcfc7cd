//! Storage group model
//!
//! A storage group is one master drive plus zero or more ordered backups.
//! Drives are identified by serial number; the drive letter is resolved at
//! runtime and never persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{GroupId, SlotKey};

/// Persisted mapping of group id to group
pub type GroupMap = BTreeMap<GroupId, StorageGroupConfig>;

/// One drive slot of a group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageDriveConfig {
    #[serde(default)]
    pub label: String,

    /// The durable identity of the drive
    #[serde(default)]
    pub serial_number: String,

    /// Blank means the drive is currently unavailable
    #[serde(skip)]
    pub drive_letter: String,
}

impl StorageDriveConfig {
    pub fn new(label: impl Into<String>, serial_number: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            serial_number: serial_number.into(),
            drive_letter: String::new(),
        }
    }

    /// Serial with surrounding whitespace removed
    pub fn serial(&self) -> &str {
        self.serial_number.trim()
    }

    /// Whether the drive was found in the latest status resolution
    pub fn is_available(&self) -> bool {
        !self.drive_letter.is_empty()
    }
}

/// A named master/backup group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageGroupConfig {
    #[serde(default)]
    pub display_name: String,

    pub master: StorageDriveConfig,

    #[serde(rename = "Backup", default)]
    pub backups: BTreeMap<SlotKey, StorageDriveConfig>,
}

impl StorageGroupConfig {
    /// Build a group with backups keyed 1..N in the given order
    pub fn new(
        display_name: impl Into<String>,
        master: StorageDriveConfig,
        backups: impl IntoIterator<Item = StorageDriveConfig>,
    ) -> Self {
        let mut group = Self {
            display_name: display_name.into(),
            master,
            backups: BTreeMap::new(),
        };
        group.set_backups(backups);
        group
    }

    /// Replace all backups, keying them contiguously from 1
    pub fn set_backups(&mut self, backups: impl IntoIterator<Item = StorageDriveConfig>) {
        self.backups.clear();
        let mut key = SlotKey::FIRST;
        for backup in backups {
            self.backups.insert(key, backup);
            key = key.next();
        }
    }

    /// Rekey the existing backups contiguously from 1, keeping their order
    pub fn renumber_backups(&mut self) {
        let backups: Vec<_> = std::mem::take(&mut self.backups).into_values().collect();
        self.set_backups(backups);
    }

    /// Name shown to the user, falling back when blank
    pub fn name_or_default(&self, id: GroupId) -> String {
        if self.display_name.trim().is_empty() {
            default_display_name(id)
        } else {
            self.display_name.clone()
        }
    }

    /// All slots with a role label: master first, then backups in order
    pub fn slots(&self) -> impl Iterator<Item = (String, &StorageDriveConfig)> {
        std::iter::once(("Master".to_string(), &self.master)).chain(
            self.backups
                .iter()
                .map(|(key, drive)| (format!("Backup {}", key), drive)),
        )
    }

    /// Mutable access to every slot
    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut StorageDriveConfig> {
        std::iter::once(&mut self.master).chain(self.backups.values_mut())
    }

    /// Non-blank serials of every slot
    pub fn serials(&self) -> Vec<String> {
        self.slots()
            .map(|(_, drive)| drive.serial().to_string())
            .filter(|serial| !serial.is_empty())
            .collect()
    }
}

/// The name given to a group whose display name is blank
pub fn default_display_name(id: GroupId) -> String {
    format!("Storage Group {}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_shape() {
        let mut group = StorageGroupConfig::new(
            "Movies",
            StorageDriveConfig::new("MOVIES_A", "ABC123"),
            vec![StorageDriveConfig::new("MOVIES_B", "DEF456")],
        );
        group.master.drive_letter = "E:".into();

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["DisplayName"], "Movies");
        assert_eq!(value["Master"]["SerialNumber"], "ABC123");
        assert_eq!(value["Master"]["Label"], "MOVIES_A");
        assert!(value["Master"].get("DriveLetter").is_none());
        assert!(value["Master"].get("drive_letter").is_none());
        assert_eq!(value["Backup"]["1"]["SerialNumber"], "DEF456");
    }

    #[test]
    fn test_missing_backup_key_defaults_to_empty() {
        let json = r#"{"DisplayName":"X","Master":{"Label":"A","SerialNumber":"S1"}}"#;
        let group: StorageGroupConfig = serde_json::from_str(json).unwrap();
        assert!(group.backups.is_empty());
        assert_eq!(group.master.serial_number, "S1");
    }

    #[test]
    fn test_renumber_backups_keeps_order() {
        let mut group = StorageGroupConfig::default();
        group
            .backups
            .insert(SlotKey::new(2).unwrap(), StorageDriveConfig::new("B", "S2"));
        group
            .backups
            .insert(SlotKey::new(5).unwrap(), StorageDriveConfig::new("C", "S5"));

        group.renumber_backups();

        let keys: Vec<u32> = group.backups.keys().map(|k| k.get()).collect();
        assert_eq!(keys, vec![1, 2]);
        assert_eq!(group.backups[&SlotKey::FIRST].serial_number, "S2");
    }

    #[test]
    fn test_name_falls_back_when_blank() {
        let group = StorageGroupConfig {
            display_name: "  ".into(),
            ..StorageGroupConfig::default()
        };
        assert_eq!(
            group.name_or_default(GroupId::new(4).unwrap()),
            "Storage Group 4"
        );
    }

    #[test]
    fn test_serials_skip_blank() {
        let group = StorageGroupConfig::new(
            "",
            StorageDriveConfig::new("A", " S1 "),
            vec![StorageDriveConfig::new("B", "")],
        );
        assert_eq!(group.serials(), vec!["S1".to_string()]);
    }
}
