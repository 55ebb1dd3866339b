use std::path::Path;

use crate::error::Result;
use crate::util::command::{low_priority, run_captured, CommandOutput};

/// Copies one source tree into the target.
pub trait SyncTool {
    fn sync(&self, source: &str, target: &Path) -> Result<CommandOutput>;
}

#[derive(Debug, Default, Clone)]
pub struct Rsync;

impl Rsync {
    pub fn args(&self, source: &str, target: &Path) -> Vec<String> {
        vec![
            "rsync".to_string(),
            "-a".to_string(),
            "--stats".to_string(),
            source.to_string(),
            target.to_string_lossy().to_string(),
        ]
    }
}

impl SyncTool for Rsync {
    fn sync(&self, source: &str, target: &Path) -> Result<CommandOutput> {
        let mut cmd = low_priority(&self.args(source, target));
        run_captured(&mut cmd)
    }
}
