use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{BackupToolError, MountError, Result};
use crate::mount::inspect::mountpoint_is_mounted;

/// Accepts a free mount point, creating it if needed; `live_mounts` is the
/// current mount list contents.
pub fn prepare_mount_point(path: &Path, live_mounts: &str) -> Result<PathBuf> {
    if path.as_os_str().is_empty() || !path.is_absolute() {
        return Err(BackupToolError::message(format!(
            "mount point {:?} must be an absolute path",
            path
        )));
    }
    let shown = path.display().to_string();
    if mountpoint_is_mounted(live_mounts, path) {
        return Err(MountError::AlreadyMounted(shown).into());
    }
    if path.exists() {
        if !path.is_dir() {
            return Err(MountError::NotADirectory(shown).into());
        }
        let mut entries = fs::read_dir(path)
            .map_err(|e| BackupToolError::message(format!("read {}: {}", shown, e)))?;
        if entries.next().is_some() {
            return Err(MountError::NotEmpty(shown).into());
        }
    } else {
        info!("creating mount point {}", shown);
        fs::create_dir_all(path)
            .map_err(|e| BackupToolError::message(format!("create {}: {}", shown, e)))?;
    }
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| BackupToolError::message(format!("chmod {}: {}", shown, e)))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn non_empty_directory_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("keep"), "x").expect("write");
        let err = prepare_mount_point(dir.path(), "").unwrap_err();
        assert!(matches!(err, BackupToolError::Mount(MountError::NotEmpty(_))));
    }

    #[test]
    fn empty_directory_is_accepted_and_opened_up() {
        let dir = TempDir::new().expect("tempdir");
        let target = dir.path().join("empty");
        fs::create_dir(&target).expect("mkdir");
        fs::set_permissions(&target, fs::Permissions::from_mode(0o700)).expect("chmod");
        let accepted = prepare_mount_point(&target, "").expect("accept");
        assert_eq!(accepted, target);
        let mode = fs::metadata(&target).expect("meta").permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[test]
    fn missing_path_is_created() {
        let dir = TempDir::new().expect("tempdir");
        let target = dir.path().join("a").join("b");
        prepare_mount_point(&target, "").expect("accept");
        assert!(target.is_dir());
    }

    #[test]
    fn regular_file_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("file");
        fs::write(&file, "x").expect("write");
        let err = prepare_mount_point(&file, "").unwrap_err();
        assert!(matches!(err, BackupToolError::Mount(MountError::NotADirectory(_))));
    }

    #[test]
    fn mounted_path_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let mounts = format!("/dev/sdb1 {} ext4 rw 0 0\n", dir.path().display());
        let err = prepare_mount_point(dir.path(), &mounts).unwrap_err();
        assert!(matches!(err, BackupToolError::Mount(MountError::AlreadyMounted(_))));
    }

    #[test]
    fn relative_path_is_rejected() {
        assert!(prepare_mount_point(Path::new("mnt/data"), "").is_err());
        assert!(prepare_mount_point(Path::new(""), "").is_err());
    }
}
