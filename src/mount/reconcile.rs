use std::fs;
use std::path::Path;

use tracing::{error, info, warn};

use crate::error::{BackupToolError, MountError, Result};
use crate::mount::fstab::write_table;
use crate::mount::ops::MountControl;

/// Installs `new_contents` as the mount table and mounts everything.
///
/// If mounting fails the previous bytes are written back and mounting is
/// retried once against them; the original failure code is returned as
/// [`MountError::Reconcile`].
pub fn apply_with_rollback(
    table: &Path,
    new_contents: &str,
    control: &dyn MountControl,
) -> Result<i32> {
    let snapshot = fs::read(table)
        .map_err(|e| BackupToolError::message(format!("snapshot {}: {}", table.display(), e)))?;
    write_table(table, new_contents.as_bytes())?;
    info!("updated {}", table.display());

    let rc = match control.mount_all() {
        Ok(rc) => rc,
        Err(err) => {
            warn!("{}", err);
            1
        }
    };
    if rc == 0 {
        return Ok(0);
    }

    warn!(
        "mount -a failed with exit code {}; restoring {}",
        rc,
        table.display()
    );
    write_table(table, &snapshot)?;
    match control.mount_all() {
        Ok(0) => info!("restored mount table applied"),
        Ok(retry) => error!("mount -a on restored table failed with exit code {}", retry),
        Err(err) => error!("mount -a on restored table: {}", err),
    }
    Err(MountError::Reconcile(rc).into())
}
