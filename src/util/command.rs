use std::process::Command;

use tracing::debug;

use crate::error::{BackupToolError, Result};

/// Exit code of a finished tool and its stdout followed by its stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    pub output: String,
}

pub fn describe(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

pub fn run_command(cmd: &mut Command) -> Result<i32> {
    debug!("run {}", describe(cmd));
    let status = cmd.status().map_err(|e| {
        BackupToolError::message(format!("{}: {}", cmd.get_program().to_string_lossy(), e))
    })?;
    Ok(status.code().unwrap_or(1))
}

pub fn run_captured(cmd: &mut Command) -> Result<CommandOutput> {
    debug!("run {}", describe(cmd));
    let out = cmd.output().map_err(|e| {
        BackupToolError::message(format!("{}: {}", cmd.get_program().to_string_lossy(), e))
    })?;
    let mut output = String::from_utf8_lossy(&out.stdout).to_string();
    output.push_str(&String::from_utf8_lossy(&out.stderr));
    Ok(CommandOutput {
        status: out.status.code().unwrap_or(1),
        output,
    })
}

/// Wraps `args` in `nice -n 19 ionice -c 3 -n7`.
pub fn low_priority(args: &[String]) -> Command {
    let mut cmd = Command::new("nice");
    cmd.arg("-n")
        .arg("19")
        .arg("ionice")
        .arg("-c")
        .arg("3")
        .arg("-n7");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
