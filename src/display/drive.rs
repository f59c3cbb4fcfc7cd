//! Drive display formatting
//!
//! Formats enumerated drives as a table and as numbered selection lists.

use crate::models::DriveRecord;

/// Format enumerated drives as a table
pub fn format_drive_list(drives: &[DriveRecord]) -> String {
    if drives.is_empty() {
        return "No drives found.".to_string();
    }

    let label_width = drives
        .iter()
        .map(|d| d.label.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let serial_width = drives
        .iter()
        .map(|d| d.serial_number.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<label_width$}  {:<serial_width$}  {:<6}  {:<8}  {:>10}  {:>10}  {}\n",
        "Drive",
        "Label",
        "Serial",
        "Bus",
        "FS",
        "Size (GB)",
        "Free (GB)",
        "Removable",
        label_width = label_width,
        serial_width = serial_width,
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<label_width$}  {:-<serial_width$}  {:-<6}  {:-<8}  {:->10}  {:->10}  {:-<9}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        label_width = label_width,
        serial_width = serial_width,
    ));

    for drive in drives {
        output.push_str(&format!(
            "{:<8}  {:<label_width$}  {:<serial_width$}  {:<6}  {:<8}  {:>10.1}  {:>10.1}  {}\n",
            drive.drive_letter,
            drive.label,
            drive.serial_number,
            drive.bus_type,
            drive.file_system,
            drive.total_space_gb,
            drive.free_space_gb,
            if drive.is_removable { "yes" } else { "no" },
            label_width = label_width,
            serial_width = serial_width,
        ));
    }

    output.push_str(&format!("\n{} drive(s)", drives.len()));
    output
}

/// Numbered list for wizard selection; drives whose serial is in `marked`
/// get a `*`
pub fn format_drive_choices(drives: &[&DriveRecord], marked: &[&str]) -> String {
    drives
        .iter()
        .enumerate()
        .map(|(i, drive)| {
            let marker = if marked.contains(&drive.serial_number.trim()) {
                "*"
            } else {
                " "
            };
            format!(" {}{:>2}. {}", marker, i + 1, drive.describe())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(letter: &str, serial: &str) -> DriveRecord {
        DriveRecord {
            label: "BACKUP".into(),
            drive_letter: letter.into(),
            serial_number: serial.into(),
            model: "Stick".into(),
            bus_type: "USB".into(),
            total_space_gb: 64.0,
            is_removable: true,
            ..DriveRecord::default()
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_drive_list(&[]), "No drives found.");
    }

    #[test]
    fn test_table_rows() {
        let output = format_drive_list(&[drive("E:", "ABC123"), drive("F:", "DEF456")]);
        assert!(output.contains("ABC123"));
        assert!(output.contains("DEF456"));
        assert!(output.ends_with("2 drive(s)"));
    }

    #[test]
    fn test_choices_numbered_and_marked() {
        let a = drive("E:", "ABC123");
        let b = drive("F:", "DEF456");
        let output = format_drive_choices(&[&a, &b], &["DEF456"]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("   1. E:"));
        assert!(lines[1].starts_with(" * 2. F:"));
    }
}
