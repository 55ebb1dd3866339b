use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::backup::report::Report;
use crate::backup::rsync::SyncTool;
use crate::config::model::BackupConfig;
use crate::error::{BackupToolError, ConfigError, Result};
use crate::outcome::Status;

pub mod report;
pub mod rsync;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub source: String,
    pub status: i32,
}

/// Per-source results plus their bitwise-OR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOutcome {
    pub target: PathBuf,
    pub aggregate: i32,
    pub sources: Vec<SourceOutcome>,
}

impl BackupOutcome {
    pub fn status(&self) -> Status {
        if self.aggregate == 0 {
            Status::Success
        } else {
            Status::Failed
        }
    }

    pub fn failed_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| s.status != 0)
            .map(|s| s.source.as_str())
            .collect()
    }
}

/// Checks the preconditions a run needs before anything is copied.
pub fn validate_backup_config(backup: Option<&BackupConfig>) -> Result<(&BackupConfig, PathBuf)> {
    let backup = backup.ok_or(ConfigError::MissingSection("backup"))?;
    if backup.sources.is_empty() {
        return Err(ConfigError::MissingKey("backup.sources").into());
    }
    let target = backup.target.trim();
    if target.is_empty() {
        return Err(ConfigError::MissingKey("backup.target").into());
    }
    Ok((backup, PathBuf::from(target)))
}

pub fn ensure_target_dir(target: &Path) -> Result<()> {
    if target.is_dir() {
        return Ok(());
    }
    if target.exists() {
        return Err(BackupToolError::message(format!(
            "target {} exists and is not a directory",
            target.display()
        )));
    }
    info!("creating target directory {}", target.display());
    fs::create_dir_all(target).map_err(|e| {
        BackupToolError::message(format!("create target {}: {}", target.display(), e))
    })
}

/// Syncs every source into the target in order, never stopping early.
pub fn perform_backup(
    backup: Option<&BackupConfig>,
    report: &mut Report,
    tool: &dyn SyncTool,
) -> Result<BackupOutcome> {
    let (backup, target) = validate_backup_config(backup)?;
    ensure_target_dir(&target)?;

    let mut aggregate = 0;
    let mut sources = Vec::with_capacity(backup.sources.len());
    for source in &backup.sources {
        info!("syncing {} -> {}", source, target.display());
        let (status, output) = match tool.sync(source, &target) {
            Ok(result) => (result.status, result.output),
            Err(err) => (127, format!("{}\n", err)),
        };
        if status == 0 {
            info!("synced {}", source);
        } else {
            warn!("sync of {} failed with exit code {}", source, status);
        }
        report.append_transfer(source, &target, &output, status)?;
        aggregate |= status;
        sources.push(SourceOutcome {
            source: source.clone(),
            status,
        });
    }

    Ok(BackupOutcome {
        target,
        aggregate,
        sources,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::util::command::CommandOutput;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    pub(crate) struct FakeSync {
        pub statuses: HashMap<String, i32>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeSync {
        pub(crate) fn new(statuses: &[(&str, i32)]) -> Self {
            Self {
                statuses: statuses
                    .iter()
                    .map(|(s, code)| (s.to_string(), *code))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SyncTool for FakeSync {
        fn sync(&self, source: &str, _target: &Path) -> Result<CommandOutput> {
            self.calls.borrow_mut().push(source.to_string());
            let status = self.statuses.get(source).copied().unwrap_or(0);
            Ok(CommandOutput {
                status,
                output: format!("copied {}\n", source),
            })
        }
    }

    fn config(sources: &[&str], target: &Path) -> BackupConfig {
        BackupConfig {
            sources: sources.iter().map(|s| s.to_string()).collect(),
            target: target.to_string_lossy().to_string(),
            recipients: Vec::new(),
            report_dir: None,
        }
    }

    #[test]
    fn aggregate_is_zero_only_when_every_source_succeeds() {
        let cases: Vec<Vec<i32>> = vec![
            vec![0],
            vec![0, 0, 0],
            vec![1],
            vec![0, 23],
            vec![24, 0, 0, 0],
            vec![0, 0, 12, 0, 30],
        ];
        for statuses in cases {
            let dir = TempDir::new().expect("tempdir");
            let names: Vec<String> = (0..statuses.len()).map(|i| format!("/src{}", i)).collect();
            let pairs: Vec<(&str, i32)> = names
                .iter()
                .map(|n| n.as_str())
                .zip(statuses.iter().copied())
                .collect();
            let tool = FakeSync::new(&pairs);
            let refs: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
            let cfg = config(&refs, &dir.path().join("target"));
            let mut report = Report::create(dir.path()).expect("report");

            let outcome = perform_backup(Some(&cfg), &mut report, &tool).expect("backup");
            let any_failed = statuses.iter().any(|s| *s != 0);
            assert_eq!(outcome.aggregate != 0, any_failed, "statuses {:?}", statuses);
            assert_eq!(outcome.sources.len(), statuses.len());
            assert_eq!(*tool.calls.borrow(), names);
        }
    }

    #[test]
    fn failing_source_does_not_stop_the_loop() {
        let dir = TempDir::new().expect("tempdir");
        let tool = FakeSync::new(&[("/a", 0), ("/b", 1), ("/c", 0)]);
        let cfg = config(&["/a", "/b", "/c"], &dir.path().join("target"));
        let mut report = Report::create(dir.path()).expect("report");

        let outcome = perform_backup(Some(&cfg), &mut report, &tool).expect("backup");
        assert_eq!(outcome.aggregate, 1);
        assert_eq!(outcome.status(), Status::Failed);
        assert_eq!(outcome.failed_sources(), vec!["/b"]);
        assert_eq!(tool.calls.borrow().len(), 3);
        assert!(dir.path().join("target").is_dir());
        let text = report.read().expect("read");
        assert_eq!(text.matches(report::SEPARATOR).count(), 3);
    }

    #[test]
    fn preconditions_fail_before_any_transfer() {
        let dir = TempDir::new().expect("tempdir");
        let tool = FakeSync::new(&[]);
        let mut report = Report::create(dir.path()).expect("report");

        assert!(perform_backup(None, &mut report, &tool).is_err());
        let no_sources = config(&[], &dir.path().join("target"));
        assert!(perform_backup(Some(&no_sources), &mut report, &tool).is_err());
        let mut no_target = config(&["/a"], dir.path());
        no_target.target = "  ".to_string();
        assert!(perform_backup(Some(&no_target), &mut report, &tool).is_err());

        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").expect("write");
        let file_target = config(&["/a"], &blocker);
        assert!(perform_backup(Some(&file_target), &mut report, &tool).is_err());

        assert!(tool.calls.borrow().is_empty());
        assert_eq!(report.read().expect("read"), "");
    }
}
