use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

use crate::disk::human_size;
use crate::error::{BackupToolError, Result};

const CANDIDATE_TYPES: [&str; 4] = ["disk", "part", "lvm", "crypt"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDevice {
    pub device: PathBuf,
    pub size_bytes: Option<u64>,
    pub kind: String,
    pub fs_type: String,
    pub mountpoint: Option<PathBuf>,
}

impl BlockDevice {
    pub fn menu_label(&self) -> String {
        let size = self
            .size_bytes
            .map(human_size)
            .unwrap_or_else(|| "unknown size".to_string());
        let fs = if self.fs_type.is_empty() {
            "no filesystem"
        } else {
            self.fs_type.as_str()
        };
        match &self.mountpoint {
            Some(mp) => format!(
                "{} ({}, {}, mounted at {})",
                self.device.display(),
                size,
                fs,
                mp.display()
            ),
            None => format!("{} ({}, {})", self.device.display(), size, fs),
        }
    }
}

/// Splits one `lsblk -P` line of `KEY="value"` pairs.
fn parse_pairs(line: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let mut rest = line.trim();
    while let Some(eq) = rest.find("=\"") {
        let key = rest[..eq].trim().to_string();
        let after = &rest[eq + 2..];
        let Some(end) = after.find('"') else {
            break;
        };
        out.insert(key, after[..end].to_string());
        rest = &after[end + 1..];
    }
    out
}

pub fn parse_lsblk(output: &str) -> Vec<BlockDevice> {
    let mut devices = Vec::new();
    for line in output.lines() {
        let fields = parse_pairs(line);
        let Some(name) = fields.get("NAME").filter(|n| !n.is_empty()) else {
            continue;
        };
        let kind = fields.get("TYPE").cloned().unwrap_or_default();
        if !CANDIDATE_TYPES.contains(&kind.as_str()) {
            continue;
        }
        let mountpoint = fields
            .get("MOUNTPOINT")
            .filter(|mp| !mp.is_empty())
            .map(PathBuf::from);
        devices.push(BlockDevice {
            device: PathBuf::from(name),
            size_bytes: fields.get("SIZE").and_then(|s| s.parse().ok()),
            kind,
            fs_type: fields.get("FSTYPE").cloned().unwrap_or_default(),
            mountpoint,
        });
    }
    devices
}

pub fn list_block_devices() -> Result<Vec<BlockDevice>> {
    let output = Command::new("lsblk")
        .args(["-P", "-p", "-b", "-o", "NAME,SIZE,TYPE,FSTYPE,MOUNTPOINT"])
        .output()
        .map_err(|e| BackupToolError::message(format!("lsblk: {}", e)))?;
    if !output.status.success() {
        return Err(BackupToolError::message(format!(
            "lsblk failed with exit code {}",
            output.status.code().unwrap_or(1)
        )));
    }
    Ok(parse_lsblk(&String::from_utf8_lossy(&output.stdout)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSBLK: &str = r#"NAME="/dev/loop0" SIZE="4096" TYPE="loop" FSTYPE="squashfs" MOUNTPOINT="/snap/core/1"
NAME="/dev/sda" SIZE="500107862016" TYPE="disk" FSTYPE="" MOUNTPOINT=""
NAME="/dev/sda1" SIZE="536870912" TYPE="part" FSTYPE="vfat" MOUNTPOINT="/boot/efi"
NAME="/dev/sdb1" SIZE="2000396746752" TYPE="part" FSTYPE="ext4" MOUNTPOINT=""
NAME="/dev/sr0" SIZE="1073741312" TYPE="rom" FSTYPE="" MOUNTPOINT=""
"#;

    #[test]
    fn lsblk_pairs_become_candidates() {
        let devices = parse_lsblk(LSBLK);
        let names: Vec<String> = devices
            .iter()
            .map(|d| d.device.display().to_string())
            .collect();
        assert_eq!(names, vec!["/dev/sda", "/dev/sda1", "/dev/sdb1"]);
        assert_eq!(devices[1].mountpoint, Some(PathBuf::from("/boot/efi")));
        assert_eq!(devices[2].size_bytes, Some(2_000_396_746_752));
        assert_eq!(devices[2].menu_label(), "/dev/sdb1 (2.00 TB, ext4)");
    }
}
