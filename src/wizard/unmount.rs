use std::path::Path;

use tracing::info;

use crate::error::{BackupToolError, Result};
use crate::mount::fstab::{list_entries, read_table, remove_line};
use crate::mount::inspect::{mountpoint_is_mounted, read_mounts};
use crate::mount::ops::MountControl;
use crate::mount::reconcile::apply_with_rollback;
use crate::settings::Settings;
use crate::wizard::{select_index, Prompter};

/// Unmounts a chosen table entry, drops its line and mounts everything.
pub fn run_unmount(
    settings: &Settings,
    prompter: &mut dyn Prompter,
    control: &dyn MountControl,
) -> Result<i32> {
    let table = read_table(&settings.fstab_path)?;
    let entries = list_entries(&table);
    if entries.is_empty() {
        return Err(BackupToolError::message(format!(
            "{} has no entries",
            settings.fstab_path.display()
        )));
    }
    let labels: Vec<String> = entries.iter().map(|line| line.entry.to_string()).collect();
    let idx = select_index(prompter, "Current mount table:", &labels)?;
    let chosen = &entries[idx];

    let mount_point = Path::new(&chosen.entry.mount_point);
    let live_mounts = read_mounts(&settings.live_mounts_path)?;
    if mountpoint_is_mounted(&live_mounts, mount_point) {
        control.unmount(mount_point)?;
        info!("unmounted {}", mount_point.display());
    }

    let updated = remove_line(&table, chosen.line_number)?;
    info!("removing mount table entry: {}", chosen.entry);
    apply_with_rollback(&settings.fstab_path, &updated, control)
}
