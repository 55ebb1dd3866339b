use std::path::Path;
use std::process::Command;

use crate::error::{BackupToolError, MountError, Result};
use crate::util::command::run_command;

/// Live mount state operations the wizards drive.
pub trait MountControl {
    /// Mounts everything listed in the table; returns the tool's exit code.
    fn mount_all(&self) -> Result<i32>;
    fn unmount(&self, mountpoint: &Path) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct SystemMount;

impl MountControl for SystemMount {
    fn mount_all(&self) -> Result<i32> {
        mount_all()
    }

    fn unmount(&self, mountpoint: &Path) -> Result<()> {
        unmount_path(mountpoint)
    }
}

pub fn mount_all() -> Result<i32> {
    let mut cmd = Command::new("mount");
    cmd.arg("-a");
    run_command(&mut cmd).map_err(|e| BackupToolError::message(format!("mount -a: {}", e)))
}

pub fn unmount_path(mountpoint: &Path) -> Result<()> {
    let mut cmd = Command::new("umount");
    cmd.arg(mountpoint);
    let rc = run_command(&mut cmd)
        .map_err(|e| BackupToolError::message(format!("umount {}: {}", mountpoint.display(), e)))?;
    if rc != 0 {
        return Err(MountError::UmountFailure(format!(
            "{} failed with exit code {}",
            mountpoint.display(),
            rc
        ))
        .into());
    }
    Ok(())
}
