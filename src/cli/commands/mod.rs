pub mod backup;
pub mod mount;
pub mod mount_samba;
pub mod schedule;
pub mod umount;

use tracing::error;

use crate::cli::args::Command;
use crate::error::{BackupToolError, MountError};
use crate::lock::InstanceLock;
use crate::outcome::Outcome;
use crate::settings::Settings;

/// A failed mount-table reconciliation hands back the status of `mount -a`; all else is 1.
pub fn exit_code_for(err: &BackupToolError) -> i32 {
    match err {
        BackupToolError::Mount(MountError::Reconcile(rc)) if *rc != 0 => *rc,
        _ => 1,
    }
}

pub fn report_error(command: Command, err: &BackupToolError) -> i32 {
    error!("{} failed: {}", command.name(), err);
    println!("{}: {}", command.name(), err);
    exit_code_for(err)
}

pub(crate) fn instance_busy(settings: &Settings) -> Outcome {
    Outcome::failed(
        1,
        format!(
            "another {} instance is running (lock {} is held)",
            settings.tool_name,
            settings.lock_path.display()
        ),
    )
}

pub(crate) fn try_lock(settings: &Settings) -> crate::error::Result<Option<InstanceLock>> {
    InstanceLock::try_acquire(&settings.lock_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn reconcile_failure_keeps_mount_status() {
        assert_eq!(exit_code_for(&MountError::Reconcile(32).into()), 32);
        assert_eq!(exit_code_for(&ConfigError::NoSchedule.into()), 1);
        assert_eq!(exit_code_for(&BackupToolError::Privilege), 1);
    }
}
