use std::env;

use anyhow::Result;
use clap::error::{ContextKind, ErrorKind};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, Command};
use crate::cli::commands::{backup, mount, mount_samba, report_error, schedule, umount};
use crate::settings::Settings;

pub mod args;
pub mod commands;

/// Parses the command line, runs one command and returns the process exit code.
pub fn run() -> Result<i32> {
    init_tracing();
    let cli = match parse_cli(env::args()) {
        Ok(cli) => cli,
        Err(code) => return Ok(code),
    };

    let settings = Settings::new(cli.config.clone());
    let result = match cli.command {
        Command::Schedule => schedule::run_schedule_command(&settings),
        Command::Backup => backup::run_backup_command(&settings),
        Command::Mount => mount::run_mount_command(&settings),
        Command::MountSamba => mount_samba::run_mount_samba_command(&settings),
        Command::Umount => umount::run_umount_command(&settings),
    };

    match result {
        Ok(outcome) => {
            outcome.print();
            Ok(outcome.code)
        }
        Err(err) => Ok(report_error(cli.command, &err)),
    }
}

fn parse_cli<I>(args: I) -> std::result::Result<Cli, i32>
where
    I: IntoIterator<Item = String>,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                Err(0)
            }
            ErrorKind::InvalidSubcommand => {
                let name = err
                    .context()
                    .find_map(|(kind, value)| {
                        (kind == ContextKind::InvalidSubcommand).then(|| value.to_string())
                    })
                    .unwrap_or_default();
                println!("unknown command: {}", name);
                print_usage();
                Err(1)
            }
            _ => {
                let _ = err.print();
                Err(1)
            }
        },
    }
}

fn print_usage() {
    println!("Usage: backup_tool [--config <path>] <schedule|backup|mount|mount-samba|umount>");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
