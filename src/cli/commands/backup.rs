use chrono::Local;
use tracing::{info, warn};

use crate::backup::report::Report;
use crate::backup::rsync::{Rsync, SyncTool};
use crate::backup::{perform_backup, validate_backup_config};
use crate::cli::commands::{instance_busy, try_lock};
use crate::config::load::load_config;
use crate::deps::{ensure_available, BACKUP_TOOLS};
use crate::error::Result;
use crate::lock::PidMarker;
use crate::notify::{send_report, Mailer, Mutt};
use crate::outcome::Outcome;
use crate::settings::Settings;
use crate::signal_handler::signal_handler;

pub fn run_backup_command(settings: &Settings) -> Result<Outcome> {
    ensure_available(&BACKUP_TOOLS)?;
    signal_handler(settings.pid_path.clone());
    run_backup_with(settings, &Rsync, &Mutt)
}

/// One full run: lock, PID marker, every source, report, mail.
pub fn run_backup_with(
    settings: &Settings,
    tool: &dyn SyncTool,
    mailer: &dyn Mailer,
) -> Result<Outcome> {
    let Some(_lock) = try_lock(settings)? else {
        return Ok(instance_busy(settings));
    };
    let _marker = PidMarker::create(&settings.pid_path)?;
    println!("{}", Local::now().format("%d-%m-%Y %H:%M"));

    let cfg = load_config(&settings.config_path)?;
    let (backup, _) = validate_backup_config(cfg.backup.as_ref())?;
    let mut report = Report::create(&settings.report_dir(backup))?;
    info!("writing report to {}", report.path().display());

    let result = perform_backup(Some(backup), &mut report, tool)?;
    let status = result.status();
    let mut outcome = Outcome {
        status,
        code: result.aggregate,
        details: vec![format!(
            "backup to {} finished: {} (status {})",
            result.target.display(),
            status,
            result.aggregate
        )],
    };
    for source in &result.sources {
        if source.status != 0 {
            outcome = outcome.with_detail(format!(
                "  {} failed with exit code {}",
                source.source, source.status
            ));
        }
    }

    if let Err(err) = send_report(
        settings,
        backup,
        status.label(),
        result.aggregate,
        report.path(),
        mailer,
    ) {
        warn!("report not mailed: {}", err);
        outcome = outcome.with_detail(format!("report not mailed: {}", err));
    }
    outcome = outcome.with_detail(format!("report: {}", report.path().display()));
    Ok(outcome)
}
