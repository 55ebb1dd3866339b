use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{info, warn};

use crate::config::model::CronConfig;
use crate::error::{BackupToolError, ConfigError, Result};
use crate::settings::Settings;

/// Reads and replaces the invoking user's job table.
pub trait CrontabStore {
    fn read(&self) -> Result<String>;
    fn replace(&self, contents: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct SystemCrontab;

impl CrontabStore for SystemCrontab {
    fn read(&self) -> Result<String> {
        let output = Command::new("crontab")
            .arg("-l")
            .output()
            .map_err(|e| BackupToolError::message(format!("crontab -l: {}", e)))?;
        let status = if output.status.success() {
            0
        } else {
            output.status.code().unwrap_or(1)
        };
        crontab_listing(
            status,
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )
    }

    fn replace(&self, contents: &str) -> Result<()> {
        let mut child = Command::new("crontab")
            .arg("-")
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| BackupToolError::message(format!("crontab: {}", e)))?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(contents.as_bytes())
                .map_err(|e| BackupToolError::message(format!("crontab: {}", e)))?;
        }
        let status = child
            .wait()
            .map_err(|e| BackupToolError::message(format!("crontab: {}", e)))?;
        if !status.success() {
            return Err(BackupToolError::message(format!(
                "crontab failed with exit code {}",
                status.code().unwrap_or(1)
            )));
        }
        Ok(())
    }
}

/// Result of `crontab -l`: only a missing table counts as empty; any other failure is an error.
pub fn crontab_listing(status: i32, stdout: &str, stderr: &str) -> Result<String> {
    if status == 0 {
        return Ok(stdout.to_string());
    }
    if stderr.contains("no crontab for") {
        return Ok(String::new());
    }
    Err(BackupToolError::message(format!(
        "crontab -l failed with exit code {}: {}",
        status,
        stderr.trim()
    )))
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub fn parse_daily_time(value: &str) -> Result<(u32, u32)> {
    let invalid = || ConfigError::InvalidTime(value.to_string());
    let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid().into());
    }
    Ok((hour, minute))
}

/// `schedule` verbatim if set, else `daily_time` as `M H * * *`.
pub fn compute_schedule(cron: &CronConfig) -> Result<String> {
    let schedule = non_empty(cron.schedule.as_ref());
    let daily_time = non_empty(cron.daily_time.as_ref());
    match (schedule, daily_time) {
        (Some(schedule), daily) => {
            if daily.is_some() {
                warn!("both cron.schedule and cron.daily_time are set; using schedule");
            }
            Ok(schedule.to_string())
        }
        (None, Some(daily)) => {
            let (hour, minute) = parse_daily_time(daily)?;
            Ok(format!("{} {} * * *", minute, hour))
        }
        (None, None) => Err(ConfigError::NoSchedule.into()),
    }
}

/// Command part of a job line; `None` for comments, blanks and variable assignments.
fn job_command(line: &str) -> Option<&str> {
    let mut rest = line.trim_start();
    if rest.is_empty() || rest.starts_with('#') {
        return None;
    }
    // `@daily` style nicknames replace all five time fields.
    let time_fields = if rest.starts_with('@') { 1 } else { 5 };
    for _ in 0..time_fields {
        let end = rest.find(char::is_whitespace)?;
        rest = rest[end..].trim_start();
    }
    Some(rest.trim_end())
}

fn runs_invocation(line: &str, invocation: &str) -> bool {
    match job_command(line) {
        Some(command) => {
            command == invocation
                || command
                    .strip_prefix(invocation)
                    .is_some_and(|rest| rest.starts_with(' '))
        }
        None => false,
    }
}

/// Drops every job whose command is `invocation` and appends one bound to `expression`.
pub fn merge_crontab(existing: &str, invocation: &str, expression: &str, command: &str) -> String {
    let mut out = String::new();
    for line in existing.lines() {
        if runs_invocation(line, invocation) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("{} {}\n", expression, command));
    out
}

pub fn install_schedule(
    settings: &Settings,
    cron: &CronConfig,
    store: &dyn CrontabStore,
) -> Result<String> {
    let expression = compute_schedule(cron)?;
    let existing = store.read()?;
    let updated = merge_crontab(
        &existing,
        &settings.backup_invocation(),
        &expression,
        &settings.scheduled_command(),
    );
    store.replace(&updated)?;
    info!("installed schedule \"{}\"", expression);
    Ok(expression)
}
