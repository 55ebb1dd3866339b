use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{info, warn};

use crate::config::model::BackupConfig;
use crate::error::{BackupToolError, ConfigError, Result};
use crate::settings::Settings;

/// Delivers one message with a single attachment to every recipient.
pub trait Mailer {
    fn send(&self, recipients: &[String], subject: &str, body: &str, attachment: &Path)
        -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct Mutt;

impl Mutt {
    pub fn command(recipients: &[String], subject: &str, attachment: &Path) -> Command {
        let mut cmd = Command::new("mutt");
        cmd.arg("-s").arg(subject).arg("-a").arg(attachment).arg("--");
        for recipient in recipients {
            cmd.arg(recipient);
        }
        cmd
    }
}

impl Mailer for Mutt {
    fn send(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<()> {
        let mut child = Self::command(recipients, subject, attachment)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| BackupToolError::message(format!("mutt: {}", e)))?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(body.as_bytes())
                .map_err(|e| BackupToolError::message(format!("mutt: {}", e)))?;
        }
        let status = child
            .wait()
            .map_err(|e| BackupToolError::message(format!("mutt: {}", e)))?;
        if !status.success() {
            return Err(BackupToolError::message(format!(
                "mutt failed with exit code {}",
                status.code().unwrap_or(1)
            )));
        }
        Ok(())
    }
}

/// Mails the report labelled with `status_label`; the result is about the send only.
pub fn send_report(
    settings: &Settings,
    backup: &BackupConfig,
    status_label: &str,
    code: i32,
    report: &Path,
    mailer: &dyn Mailer,
) -> Result<()> {
    if backup.recipients.is_empty() {
        warn!("no recipients configured; report {} not mailed", report.display());
        return Err(ConfigError::MissingKey("backup.recipients").into());
    }
    let subject = settings.status_subject(status_label);
    let body = format!("Backup finished: {} (status {})\n", status_label, code);
    match mailer.send(&backup.recipients, &subject, &body, report) {
        Ok(()) => {
            info!("report sent to {}", backup.recipients.join(", "));
            Ok(())
        }
        Err(err) => {
            warn!("sending report failed: {}", err);
            Err(err)
        }
    }
}
