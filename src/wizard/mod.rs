//! Interactive mount helpers.
//!
//! Each attach flow walks the same states: pick a source, pick a free mount
//! point, pick read-only or read-write. Input comes from a [`Prompter`] so the
//! flows run the same against the console and against scripted answers.

use std::path::{Path, PathBuf};

use inquire::{Password, Text};

use crate::error::{BackupToolError, Result};
use crate::mount::mountpoint::prepare_mount_point;

pub mod local;
pub mod samba;
pub mod unmount;

pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<String>;

    fn ask_secret(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)
    }

    fn say(&mut self, message: &str);
}

#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        Text::new(prompt)
            .prompt()
            .map_err(|e| BackupToolError::message(format!("input: {}", e)))
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String> {
        Password::new(prompt)
            .without_confirmation()
            .prompt()
            .map_err(|e| BackupToolError::message(format!("input: {}", e)))
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Prints `items` as a 1-based menu and asks until an in-range number is given.
pub fn select_index(prompter: &mut dyn Prompter, title: &str, items: &[String]) -> Result<usize> {
    if items.is_empty() {
        return Err(BackupToolError::message(format!("{}: nothing to choose from", title)));
    }
    prompter.say(title);
    for (idx, item) in items.iter().enumerate() {
        prompter.say(&format!("  {}) {}", idx + 1, item));
    }
    loop {
        let answer = prompter.ask(&format!("Select 1-{}:", items.len()))?;
        match answer.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= items.len() => return Ok(n - 1),
            _ => prompter.say(&format!(
                "invalid selection {:?}; enter a number between 1 and {}",
                answer.trim(),
                items.len()
            )),
        }
    }
}

pub fn show_table(prompter: &mut dyn Prompter, contents: &str) {
    prompter.say("Current mount table:");
    for line in contents.lines() {
        prompter.say(&format!("  {}", line));
    }
}

/// Only a literal `y` or `n` ends the question.
pub fn ask_yes_no(prompter: &mut dyn Prompter, question: &str) -> Result<bool> {
    loop {
        match prompter.ask(&format!("{} (y/n):", question))?.trim() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => prompter.say("please answer y or n"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    SelectingSource,
    SelectingMountPoint,
    SelectingMode,
    Confirmed,
}

/// Everything an attach flow collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachPlan<S> {
    pub source: S,
    pub mount_point: PathBuf,
    pub read_only: bool,
}

impl<S> AttachPlan<S> {
    pub fn mode_option(&self) -> &'static str {
        if self.read_only {
            "ro"
        } else {
            "rw"
        }
    }
}

pub struct AttachFlow<'a> {
    state: WizardState,
    live_mounts: &'a str,
}

impl<'a> AttachFlow<'a> {
    pub fn new(live_mounts: &'a str) -> Self {
        Self {
            state: WizardState::SelectingSource,
            live_mounts,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn run<S>(
        mut self,
        prompter: &mut dyn Prompter,
        pick_source: impl FnOnce(&mut dyn Prompter) -> Result<S>,
    ) -> Result<AttachPlan<S>> {
        let mut pick_source = Some(pick_source);
        let mut source = None;
        let mut mount_point = None;
        let mut read_only = None;
        loop {
            self.state = match self.state {
                WizardState::SelectingSource => {
                    let pick = pick_source
                        .take()
                        .ok_or_else(|| BackupToolError::message("source already selected"))?;
                    source = Some(pick(&mut *prompter)?);
                    WizardState::SelectingMountPoint
                }
                WizardState::SelectingMountPoint => {
                    let answer = prompter.ask("Mount point (absolute path):")?;
                    match prepare_mount_point(Path::new(answer.trim()), self.live_mounts) {
                        Ok(path) => {
                            mount_point = Some(path);
                            WizardState::SelectingMode
                        }
                        Err(err) => {
                            prompter.say(&format!("rejected: {}", err));
                            WizardState::SelectingMountPoint
                        }
                    }
                }
                WizardState::SelectingMode => {
                    read_only = Some(ask_yes_no(prompter, "Mount read-only?")?);
                    WizardState::Confirmed
                }
                WizardState::Confirmed => {
                    return match (source, mount_point, read_only) {
                        (Some(source), Some(mount_point), Some(read_only)) => Ok(AttachPlan {
                            source,
                            mount_point,
                            read_only,
                        }),
                        _ => Err(BackupToolError::message("mount wizard ended incomplete")),
                    };
                }
            };
        }
    }
}
