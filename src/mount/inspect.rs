use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BackupToolError, Result};
use crate::mount::fstab::unescape;

pub fn read_mounts(live_mounts: &Path) -> Result<String> {
    fs::read_to_string(live_mounts)
        .map_err(|e| BackupToolError::message(format!("read {}: {}", live_mounts.display(), e)))
}

pub fn mounted_paths(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                return None;
            }
            Some(PathBuf::from(unescape(fields[1])))
        })
        .collect()
}

/// Exact comparison on the mount point field, not a substring search.
pub fn mountpoint_is_mounted(contents: &str, mountpoint: &Path) -> bool {
    mounted_paths(contents)
        .iter()
        .any(|mounted| mounted.as_path() == mountpoint)
}
