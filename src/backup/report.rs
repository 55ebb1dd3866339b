use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::error::{BackupToolError, Result};

pub const SEPARATOR: &str = "----------------------------------------";

pub fn report_file_name(day: NaiveDate) -> String {
    format!("backup_report_{}.txt", day.format("%Y-%m-%d"))
}

/// Append-only transcript for one day's run.
#[derive(Debug)]
pub struct Report {
    path: PathBuf,
}

impl Report {
    /// Creates (or truncates) today's report in `dir`.
    pub fn create(dir: &Path) -> Result<Report> {
        Self::create_for(dir, Local::now().date_naive())
    }

    pub fn create_for(dir: &Path, day: NaiveDate) -> Result<Report> {
        fs::create_dir_all(dir)
            .map_err(|e| BackupToolError::message(format!("create {}: {}", dir.display(), e)))?;
        let path = dir.join(report_file_name(day));
        File::create(&path)
            .map_err(|e| BackupToolError::message(format!("create {}: {}", path.display(), e)))?;
        Ok(Report { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_transfer(
        &mut self,
        source: &str,
        target: &Path,
        output: &str,
        status: i32,
    ) -> Result<()> {
        let marker = if status == 0 {
            "OK".to_string()
        } else {
            format!("FAILED (exit code {})", status)
        };
        let mut block = String::new();
        block.push_str(&format!("{}\n", Local::now().format("%d-%m-%Y %H:%M:%S")));
        block.push_str(&format!("source: {}\n", source));
        block.push_str(&format!("target: {}\n", target.display()));
        block.push_str(output);
        if !output.is_empty() && !output.ends_with('\n') {
            block.push('\n');
        }
        block.push_str(&format!("result: {}\n", marker));
        block.push_str(SEPARATOR);
        block.push('\n');
        self.append(&block)
    }

    pub fn append(&mut self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| BackupToolError::message(format!("open {}: {}", self.path.display(), e)))?;
        file.write_all(text.as_bytes())
            .map_err(|e| BackupToolError::message(format!("write {}: {}", self.path.display(), e)))?;
        Ok(())
    }

    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| BackupToolError::message(format!("read {}: {}", self.path.display(), e)))
    }
}
