use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::model::{BackupConfig, Config, CronConfig};
use crate::error::{ConfigError, Result};

pub fn load_config(path: &Path) -> Result<Config> {
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config =
        serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(cfg)
}

impl Config {
    pub fn backup_section(&self) -> Result<&BackupConfig> {
        Ok(self
            .backup
            .as_ref()
            .ok_or(ConfigError::MissingSection("backup"))?)
    }

    pub fn cron_section(&self) -> Result<&CronConfig> {
        Ok(self
            .cron
            .as_ref()
            .ok_or(ConfigError::MissingSection("cron"))?)
    }
}
