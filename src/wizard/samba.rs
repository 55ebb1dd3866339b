use tracing::info;

use crate::error::Result;
use crate::mount::fstab::{append_entry, read_table, FstabEntry};
use crate::mount::inspect::read_mounts;
use crate::mount::ops::MountControl;
use crate::mount::reconcile::apply_with_rollback;
use crate::settings::Settings;
use crate::wizard::{show_table, AttachFlow, AttachPlan, Prompter};

pub const SHARE_FS_TYPE: &str = "cifs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSource {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `server/share` and `/server/share` both become `//server/share`.
pub fn normalize_share_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("//") {
        url.to_string()
    } else {
        format!("//{}", url.trim_start_matches('/'))
    }
}

pub fn share_options(source: &ShareSource, mode: &str) -> String {
    let mut options = Vec::new();
    match &source.username {
        Some(user) => {
            options.push(format!("username={}", user));
            if let Some(password) = &source.password {
                options.push(format!("password={}", password));
            }
        }
        None => options.push("guest".to_string()),
    }
    options.push(mode.to_string());
    options.join(",")
}

pub fn share_entry(plan: &AttachPlan<ShareSource>) -> FstabEntry {
    FstabEntry {
        spec: plan.source.url.clone(),
        mount_point: plan.mount_point.to_string_lossy().to_string(),
        fs_type: SHARE_FS_TYPE.to_string(),
        options: share_options(&plan.source, plan.mode_option()),
        dump: 0,
        pass: 0,
    }
}

fn ask_credential(prompter: &mut dyn Prompter, prompt: &str, secret: bool) -> Result<Option<String>> {
    loop {
        let answer = if secret {
            prompter.ask_secret(prompt)?
        } else {
            prompter.ask(prompt)?
        };
        let answer = answer.trim().to_string();
        if answer.contains(',') || answer.contains(char::is_whitespace) {
            prompter.say("commas and whitespace cannot be stored in the mount table");
            continue;
        }
        return Ok(if answer.is_empty() { None } else { Some(answer) });
    }
}

fn ask_share(prompter: &mut dyn Prompter) -> Result<ShareSource> {
    let url = loop {
        let answer = prompter.ask("Share URL (//server/share):")?;
        if answer.trim().trim_start_matches('/').is_empty() {
            prompter.say("a share URL is required");
            continue;
        }
        break normalize_share_url(&answer);
    };
    let username = ask_credential(prompter, "Username (empty for guest):", false)?;
    let password = match username {
        Some(_) => ask_credential(prompter, "Password (empty for none):", true)?,
        None => None,
    };
    Ok(ShareSource {
        url,
        username,
        password,
    })
}

/// Records a network share in the mount table and mounts everything.
pub fn run_samba_mount(
    settings: &Settings,
    prompter: &mut dyn Prompter,
    control: &dyn MountControl,
) -> Result<i32> {
    let table = read_table(&settings.fstab_path)?;
    show_table(prompter, &table);
    let live_mounts = read_mounts(&settings.live_mounts_path)?;

    let plan = AttachFlow::new(&live_mounts).run(prompter, ask_share)?;
    let entry = share_entry(&plan);
    info!(
        "adding mount table entry for {} at {}",
        entry.spec, entry.mount_point
    );
    let updated = append_entry(&table, &entry);
    apply_with_rollback(&settings.fstab_path, &updated, control)
}
