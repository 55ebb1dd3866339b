use std::env;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::error::{BackupToolError, Result};

pub const BACKUP_TOOLS: [&str; 4] = ["rsync", "nice", "ionice", "mutt"];
pub const SCHEDULE_TOOLS: [&str; 1] = ["crontab"];
pub const MOUNT_TOOLS: [&str; 3] = ["lsblk", "blkid", "mount"];
pub const SAMBA_TOOLS: [&str; 2] = ["mount", "mount.cifs"];
pub const UMOUNT_TOOLS: [&str; 2] = ["umount", "mount"];

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

pub fn find_in_path(tool: &str, search_path: &str) -> bool {
    env::split_paths(search_path).any(|dir| is_executable(&dir.join(tool)))
}

pub fn missing_tools(tools: &[&str], search_path: &str) -> Vec<String> {
    tools
        .iter()
        .filter(|tool| !find_in_path(tool, search_path))
        .map(|tool| tool.to_string())
        .collect()
}

/// Fails with every missing tool named at once.
pub fn ensure_available(tools: &[&str]) -> Result<()> {
    let search_path = env::var("PATH").unwrap_or_default();
    // cron's PATH omits the sbin directories.
    let search_path = format!("{}:/usr/sbin:/sbin", search_path);
    let missing = missing_tools(tools, &search_path);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BackupToolError::MissingDependencies(missing))
    }
}
