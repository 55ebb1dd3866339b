pub mod discovery;
pub mod fs_type;

use crate::disk::fs_type::{detect_fs_type, detect_fs_uuid, FsType};
use crate::error::{BackupToolError, Result};

/// Stable identity of a block device as the mount table should record it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProbe {
    pub uuid: String,
    pub fs_type: FsType,
}

impl DeviceProbe {
    pub fn fstab_spec(&self) -> String {
        format!("UUID={}", self.uuid)
    }
}

pub fn probe_device(device: &str) -> Result<DeviceProbe> {
    let fs_type = detect_fs_type(device)?;
    if !fs_type.is_mountable() {
        return Err(BackupToolError::message(format!(
            "{} holds {}; it cannot be mounted directly",
            device, fs_type
        )));
    }
    let uuid = detect_fs_uuid(device)?;
    Ok(DeviceProbe { uuid, fs_type })
}

pub fn human_size(bytes: u64) -> String {
    let units = ["MB", "GB", "TB", "PB"];
    let mut value = bytes as f64 / 1_000_000f64;
    let mut idx = 0usize;
    while value >= 1000.0 && idx + 1 < units.len() {
        value /= 1000.0;
        idx += 1;
    }
    if value < 0.1 {
        format!("0.1 {}", units[idx])
    } else if value < 10.0 {
        format!("{:.2} {}", value, units[idx])
    } else if value < 100.0 {
        format!("{:.1} {}", value, units[idx])
    } else {
        format!("{:.0} {}", value, units[idx])
    }
}
