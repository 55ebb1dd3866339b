use crate::cli::commands::{instance_busy, try_lock};
use crate::deps::{ensure_available, MOUNT_TOOLS};
use crate::disk::discovery::list_block_devices;
use crate::disk::probe_device;
use crate::error::{BackupToolError, Result};
use crate::mount::ops::SystemMount;
use crate::outcome::Outcome;
use crate::privilege::require_root;
use crate::settings::Settings;
use crate::wizard::local::run_local_mount;
use crate::wizard::ConsolePrompter;

pub fn run_mount_command(settings: &Settings) -> Result<Outcome> {
    require_root()?;
    ensure_available(&MOUNT_TOOLS)?;
    let Some(_lock) = try_lock(settings)? else {
        return Ok(instance_busy(settings));
    };

    let devices = list_block_devices()?;
    if devices.is_empty() {
        return Err(BackupToolError::message("no block devices found"));
    }
    let rc = run_local_mount(
        settings,
        &mut ConsolePrompter,
        &devices,
        &probe_device,
        &SystemMount,
    )?;
    Ok(Outcome::from_code(rc).with_detail(format!(
        "{} updated; mount -a exited {}",
        settings.fstab_path.display(),
        rc
    )))
}
