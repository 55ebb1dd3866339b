use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use tracing::debug;

use crate::error::{BackupToolError, Result};

/// Exclusive advisory lock held for the lifetime of the value.
///
/// The kernel drops the lock when the descriptor closes, so any way the
/// process ends releases it.
pub struct InstanceLock {
    _lock: Flock<File>,
}

impl InstanceLock {
    /// Returns `Ok(None)` at once if another holder has the lock.
    pub fn try_acquire(path: &Path) -> Result<Option<InstanceLock>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| BackupToolError::message(format!("open {}: {}", path.display(), e)))?;
        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => {
                debug!("acquired lock {}", path.display());
                Ok(Some(InstanceLock { _lock: lock }))
            }
            Err((_, errno)) if errno == Errno::EAGAIN => Ok(None),
            Err((_, errno)) => Err(BackupToolError::message(format!(
                "flock {}: {}",
                path.display(),
                errno
            ))),
        }
    }
}

/// PID file advertising a running backup; removed on drop if still ours.
pub struct PidMarker {
    path: PathBuf,
}

impl PidMarker {
    pub fn create(path: &Path) -> Result<PidMarker> {
        let mut file = File::create(path)
            .map_err(|e| BackupToolError::message(format!("create {}: {}", path.display(), e)))?;
        writeln!(file, "{}", std::process::id())
            .map_err(|e| BackupToolError::message(format!("write {}: {}", path.display(), e)))?;
        Ok(PidMarker {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidMarker {
    fn drop(&mut self) {
        let _ = remove_if_owned(&self.path);
    }
}

pub fn remove_if_owned(path: &Path) -> io::Result<bool> {
    let pid = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if pid.trim() != std::process::id().to_string() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn second_acquire_fails_without_waiting() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tool.lock");
        let first = InstanceLock::try_acquire(&path).expect("first");
        assert!(first.is_some());
        let second = InstanceLock::try_acquire(&path).expect("second");
        assert!(second.is_none());
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tool.lock");
        let first = InstanceLock::try_acquire(&path).expect("first");
        drop(first);
        let again = InstanceLock::try_acquire(&path).expect("again");
        assert!(again.is_some());
    }

    #[test]
    fn concurrent_callers_get_exactly_one_lock() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tool.lock");
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let path = path.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    let lock = InstanceLock::try_acquire(&path).expect("try");
                    let held = lock.is_some();
                    barrier.wait();
                    held
                })
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().expect("join")).collect();
        assert_eq!(results.iter().filter(|held| **held).count(), 1);
    }

    #[test]
    fn pid_marker_removed_on_drop() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tool.pid");
        let marker = PidMarker::create(&path).expect("create");
        assert!(marker.path().exists());
        drop(marker);
        assert!(!path.exists());
    }

    #[test]
    fn foreign_pid_marker_is_left_alone() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tool.pid");
        fs::write(&path, "999999999\n").expect("write");
        assert!(!remove_if_owned(&path).expect("remove"));
        assert!(path.exists());
    }
}
