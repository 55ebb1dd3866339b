use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupToolError {
    #[error("{0}")]
    Message(String),
    #[error("{0}")]
    Config(ConfigError),
    #[error("{0}")]
    Mount(MountError),
    #[error("missing required tools: {}", .0.join(", "))]
    MissingDependencies(Vec<String>),
    #[error("this command must be run as root")]
    Privilege,
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {0}")]
    Read(String),
    #[error("parse config: {0}")]
    Parse(String),
    #[error("config section [{0}] is missing")]
    MissingSection(&'static str),
    #[error("config key {0} is missing or empty")]
    MissingKey(&'static str),
    #[error("invalid daily_time {0:?}; expected HH:MM with 00<=HH<=23 and 00<=MM<=59")]
    InvalidTime(String),
    #[error("neither cron.schedule nor cron.daily_time is set")]
    NoSchedule,
}

#[derive(Debug, Error)]
pub enum MountError {
    #[error("{0} is already mounted")]
    AlreadyMounted(String),
    #[error("{0} exists and is not a directory")]
    NotADirectory(String),
    #[error("{0} is not empty")]
    NotEmpty(String),
    #[error("umount {0}")]
    UmountFailure(String),
    #[error("mount table reconciliation failed with exit code {0}; previous table restored")]
    Reconcile(i32),
}

pub type Result<T> = std::result::Result<T, BackupToolError>;

impl BackupToolError {
    pub fn message(msg: impl Into<String>) -> Self {
        BackupToolError::Message(msg.into())
    }
}

impl From<ConfigError> for BackupToolError {
    fn from(err: ConfigError) -> Self {
        BackupToolError::Config(err)
    }
}

impl From<MountError> for BackupToolError {
    fn from(err: MountError) -> Self {
        BackupToolError::Mount(err)
    }
}
