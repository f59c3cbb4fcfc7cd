//! Drive model
//!
//! A normalized view of one mounted volume on a physical disk, rebuilt on
//! every enumeration.

use serde::{Deserialize, Serialize};

/// OS drive type code for removable media
pub const DRIVE_TYPE_REMOVABLE: u32 = 2;

const USB: &str = "USB";

/// One enumerated drive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveRecord {
    pub label: String,
    pub drive_letter: String,
    pub disk_number: u32,
    pub manufacturer: String,
    pub model: String,
    /// Trimmed, may be empty
    pub serial_number: String,
    pub name: String,
    pub file_system: String,
    pub partition_kind: String,
    pub total_space_gb: f64,
    pub free_space_gb: f64,
    pub used_space_gb: f64,
    pub health_status: String,
    pub bus_type: String,
    pub interface_type: String,
    pub drive_type_code: u32,
    pub is_removable: bool,
}

impl DriveRecord {
    /// Whether the drive may be assigned to a storage group
    pub fn is_group_candidate(&self) -> bool {
        self.is_removable || self.bus_type == USB || self.interface_type == USB
    }

    /// Whether the drive carries a usable serial number
    pub fn has_serial(&self) -> bool {
        !self.serial_number.trim().is_empty()
    }

    /// Short human-readable description for selection lists
    pub fn describe(&self) -> String {
        let label = if self.label.is_empty() {
            "(no label)"
        } else {
            self.label.as_str()
        };
        format!(
            "{} {} - {} [{}] {:.1} GB",
            self.drive_letter, label, self.model, self.serial_number, self.total_space_gb
        )
    }
}

/// Derive removability from the OS drive type and the bus/interface names
///
/// Blank bus or interface strings never count as USB.
pub fn is_removable_device(drive_type_code: u32, bus_type: &str, interface_type: &str) -> bool {
    drive_type_code == DRIVE_TYPE_REMOVABLE || bus_type == USB || interface_type == USB
}

/// Convert a byte count to gigabytes rounded to three decimals
pub fn bytes_to_gb(bytes: u64) -> f64 {
    let gb = bytes as f64 / 1_073_741_824.0;
    (gb * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removability_truth_table() {
        let codes = [0, 2, 3];
        let names = ["", "USB", "SATA", "NVMe"];

        for code in codes {
            for bus in names {
                for iface in names {
                    let expected = code == 2 || bus == "USB" || iface == "USB";
                    assert_eq!(
                        is_removable_device(code, bus, iface),
                        expected,
                        "code={} bus={:?} iface={:?}",
                        code,
                        bus,
                        iface
                    );
                }
            }
        }
    }

    #[test]
    fn test_blank_fields_are_not_usb() {
        assert!(!is_removable_device(3, "", ""));
    }

    #[test]
    fn test_bytes_to_gb_rounds_to_three_decimals() {
        assert_eq!(bytes_to_gb(0), 0.0);
        assert_eq!(bytes_to_gb(1_073_741_824), 1.0);
        assert_eq!(bytes_to_gb(1_500_000_000), 1.397);
    }

    #[test]
    fn test_group_candidate() {
        let drive = DriveRecord {
            bus_type: "USB".into(),
            ..DriveRecord::default()
        };
        assert!(drive.is_group_candidate());
        assert!(!DriveRecord::default().is_group_candidate());
    }
}
