use std::fmt;
use std::process::Command;

use crate::error::{BackupToolError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsType {
    Ext2,
    Ext3,
    Ext4,
    Xfs,
    Btrfs,
    Vfat,
    Exfat,
    Ntfs,
    Swap,
    Member(String),
    Unknown,
    Other(String),
}

impl FsType {
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => FsType::Unknown,
            "ext2" => FsType::Ext2,
            "ext3" => FsType::Ext3,
            "ext4" => FsType::Ext4,
            "xfs" => FsType::Xfs,
            "btrfs" => FsType::Btrfs,
            "vfat" | "fat" | "fat32" | "msdos" => FsType::Vfat,
            "exfat" => FsType::Exfat,
            "ntfs" | "ntfs3" => FsType::Ntfs,
            "swap" => FsType::Swap,
            member @ ("linux_raid_member" | "lvm2_member" | "crypto_luks" | "zfs_member") => {
                FsType::Member(member.to_string())
            }
            other => FsType::Other(other.to_string()),
        }
    }

    /// Whether a table entry for this type can be mounted directly.
    pub fn is_mountable(&self) -> bool {
        !matches!(self, FsType::Swap | FsType::Member(_) | FsType::Unknown)
    }

    /// ext filesystems are checked at boot after the root filesystem.
    pub fn fsck_pass(&self) -> u8 {
        match self {
            FsType::Ext2 | FsType::Ext3 | FsType::Ext4 => 2,
            _ => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FsType::Ext2 => "ext2",
            FsType::Ext3 => "ext3",
            FsType::Ext4 => "ext4",
            FsType::Xfs => "xfs",
            FsType::Btrfs => "btrfs",
            FsType::Vfat => "vfat",
            FsType::Exfat => "exfat",
            FsType::Ntfs => "ntfs",
            FsType::Swap => "swap",
            FsType::Member(name) => name,
            FsType::Unknown => "unknown",
            FsType::Other(name) => name,
        }
    }
}

impl fmt::Display for FsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn blkid_value(device: &str, tag: &str) -> Result<String> {
    let output = Command::new("blkid")
        .arg("-o")
        .arg("value")
        .arg("-s")
        .arg(tag)
        .arg(device)
        .output()
        .map_err(|e| BackupToolError::message(format!("blkid {}: {}", device, e)))?;
    if !output.status.success() {
        return Err(BackupToolError::message(format!(
            "blkid {} failed with exit code {}",
            device,
            output.status.code().unwrap_or(1)
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub fn detect_fs_type(device: &str) -> Result<FsType> {
    Ok(FsType::from_str(&blkid_value(device, "TYPE")?))
}

pub fn detect_fs_uuid(device: &str) -> Result<String> {
    let uuid = blkid_value(device, "UUID")?;
    if uuid.is_empty() {
        return Err(BackupToolError::message(format!(
            "no filesystem UUID found for device {}",
            device
        )));
    }
    Ok(uuid)
}
