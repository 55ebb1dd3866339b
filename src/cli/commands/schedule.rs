use crate::cli::commands::{instance_busy, try_lock};
use crate::config::load::load_config;
use crate::deps::{ensure_available, SCHEDULE_TOOLS};
use crate::error::Result;
use crate::outcome::Outcome;
use crate::schedule::{install_schedule, CrontabStore, SystemCrontab};
use crate::settings::Settings;

pub fn run_schedule_command(settings: &Settings) -> Result<Outcome> {
    ensure_available(&SCHEDULE_TOOLS)?;
    run_schedule_with(settings, &SystemCrontab)
}

pub fn run_schedule_with(settings: &Settings, store: &dyn CrontabStore) -> Result<Outcome> {
    let Some(_lock) = try_lock(settings)? else {
        return Ok(instance_busy(settings));
    };
    let cfg = load_config(&settings.config_path)?;
    let expression = install_schedule(settings, cfg.cron_section()?, store)?;
    Ok(Outcome::success().with_detail(format!(
        "scheduled: {} {}",
        expression,
        settings.scheduled_command()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackupToolError, ConfigError};
    use crate::schedule::tests::MemoryCrontab;
    use crate::settings::test_settings;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn daily_time_becomes_crontab_line() {
        let dir = TempDir::new().expect("tempdir");
        let settings = test_settings(dir.path());
        fs::write(&settings.config_path, "cron:\n  daily_time: \"02:30\"\n").expect("config");

        let store = MemoryCrontab::default();
        let outcome = run_schedule_with(&settings, &store).expect("schedule");

        assert_eq!(outcome.code, 0);
        let expected = format!(
            "30 2 * * * /usr/bin/backup_tool backup --config {}\n",
            settings.config_path.display()
        );
        assert_eq!(*store.table.borrow(), expected);
    }

    #[test]
    fn missing_cron_section_fails() {
        let dir = TempDir::new().expect("tempdir");
        let settings = test_settings(dir.path());
        fs::write(&settings.config_path, "backup:\n  target: /srv\n").expect("config");

        let err = run_schedule_with(&settings, &MemoryCrontab::default()).unwrap_err();
        assert!(matches!(
            err,
            BackupToolError::Config(ConfigError::MissingSection("cron"))
        ));
    }
}
