use crate::cli::commands::{instance_busy, try_lock};
use crate::deps::{ensure_available, UMOUNT_TOOLS};
use crate::error::Result;
use crate::mount::ops::SystemMount;
use crate::outcome::Outcome;
use crate::privilege::require_root;
use crate::settings::Settings;
use crate::wizard::unmount::run_unmount;
use crate::wizard::ConsolePrompter;

pub fn run_umount_command(settings: &Settings) -> Result<Outcome> {
    require_root()?;
    ensure_available(&UMOUNT_TOOLS)?;
    let Some(_lock) = try_lock(settings)? else {
        return Ok(instance_busy(settings));
    };

    let rc = run_unmount(settings, &mut ConsolePrompter, &SystemMount)?;
    Ok(Outcome::from_code(rc).with_detail(format!(
        "entry removed from {}",
        settings.fstab_path.display()
    )))
}
