use crate::cli::commands::{instance_busy, try_lock};
use crate::deps::{ensure_available, SAMBA_TOOLS};
use crate::error::Result;
use crate::mount::ops::SystemMount;
use crate::outcome::Outcome;
use crate::privilege::require_root;
use crate::settings::Settings;
use crate::wizard::samba::run_samba_mount;
use crate::wizard::ConsolePrompter;

pub fn run_mount_samba_command(settings: &Settings) -> Result<Outcome> {
    require_root()?;
    ensure_available(&SAMBA_TOOLS)?;
    let Some(_lock) = try_lock(settings)? else {
        return Ok(instance_busy(settings));
    };

    let rc = run_samba_mount(settings, &mut ConsolePrompter, &SystemMount)?;
    Ok(Outcome::from_code(rc).with_detail(format!(
        "share added to {}",
        settings.fstab_path.display()
    )))
}
