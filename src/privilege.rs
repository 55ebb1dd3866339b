use nix::unistd::geteuid;

use crate::error::{BackupToolError, Result};

pub fn require_root() -> Result<()> {
    if geteuid().is_root() {
        Ok(())
    } else {
        Err(BackupToolError::Privilege)
    }
}
