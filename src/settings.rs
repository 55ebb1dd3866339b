use std::path::{Path, PathBuf};

use crate::config::model::BackupConfig;

pub const TOOL_NAME: &str = "backup_tool";
pub const CONFIG_FILE: &str = "/etc/backup_tool.yaml";
pub const LOCK_FILE: &str = "/var/lock/backup_tool.lock";
pub const PID_FILE: &str = "/var/run/backup_tool.pid";
pub const FSTAB_FILE: &str = "/etc/fstab";
pub const LIVE_MOUNTS_FILE: &str = "/proc/self/mounts";

/// Paths and names fixed for one invocation, handed to every component.
#[derive(Debug, Clone)]
pub struct Settings {
    pub tool_name: String,
    pub config_path: PathBuf,
    pub lock_path: PathBuf,
    pub pid_path: PathBuf,
    pub fstab_path: PathBuf,
    pub live_mounts_path: PathBuf,
    pub work_dir: PathBuf,
    pub executable: PathBuf,
}

impl Settings {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let executable = std::env::current_exe().unwrap_or_else(|_| PathBuf::from(TOOL_NAME));
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            tool_name: TOOL_NAME.to_string(),
            config_path: config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE)),
            lock_path: PathBuf::from(LOCK_FILE),
            pid_path: PathBuf::from(PID_FILE),
            fstab_path: PathBuf::from(FSTAB_FILE),
            live_mounts_path: PathBuf::from(LIVE_MOUNTS_FILE),
            work_dir,
            executable,
        }
    }

    /// Directory the dated report lands in.
    pub fn report_dir(&self, backup: &BackupConfig) -> PathBuf {
        match backup.report_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => self.work_dir.clone(),
        }
    }

    /// The command line the scheduler runs; also used to find our own crontab lines.
    pub fn backup_invocation(&self) -> String {
        format!("{} backup", self.executable.display())
    }

    pub fn scheduled_command(&self) -> String {
        let mut command = self.backup_invocation();
        if self.config_path != Path::new(CONFIG_FILE) {
            command.push_str(&format!(" --config {}", self.config_path.display()));
        }
        command
    }

    pub fn status_subject(&self, label: &str) -> String {
        format!("[{}]{}", self.tool_name, label)
    }
}

#[cfg(test)]
pub(crate) fn test_settings(root: &Path) -> Settings {
    Settings {
        tool_name: TOOL_NAME.to_string(),
        config_path: root.join("backup_tool.yaml"),
        lock_path: root.join("backup_tool.lock"),
        pid_path: root.join("backup_tool.pid"),
        fstab_path: root.join("fstab"),
        live_mounts_path: root.join("mounts"),
        work_dir: root.to_path_buf(),
        executable: PathBuf::from("/usr/bin/backup_tool"),
    }
}
