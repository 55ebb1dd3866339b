use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "backup_tool", version, about = "Scheduled rsync backups and mount table upkeep")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install or replace the crontab entry that runs `backup`
    Schedule,
    /// Sync every configured source into the target and mail the report
    Backup,
    /// Add a local block device to the mount table
    Mount,
    /// Add a network share to the mount table
    #[command(name = "mount-samba")]
    MountSamba,
    /// Remove an entry from the mount table
    Umount,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Schedule => "schedule",
            Command::Backup => "backup",
            Command::Mount => "mount",
            Command::MountSamba => "mount-samba",
            Command::Umount => "umount",
        }
    }
}
