use tracing::info;

use crate::disk::discovery::BlockDevice;
use crate::disk::DeviceProbe;
use crate::error::Result;
use crate::mount::fstab::{append_entry, read_table, FstabEntry};
use crate::mount::inspect::read_mounts;
use crate::mount::ops::MountControl;
use crate::mount::reconcile::apply_with_rollback;
use crate::settings::Settings;
use crate::wizard::{select_index, show_table, AttachFlow, AttachPlan, Prompter};

pub fn local_entry(plan: &AttachPlan<DeviceProbe>) -> FstabEntry {
    FstabEntry {
        spec: plan.source.fstab_spec(),
        mount_point: plan.mount_point.to_string_lossy().to_string(),
        fs_type: plan.source.fs_type.to_string(),
        options: format!("defaults,{}", plan.mode_option()),
        dump: 0,
        pass: plan.source.fs_type.fsck_pass(),
    }
}

/// Picks a device, records it by UUID in the mount table and mounts everything.
pub fn run_local_mount(
    settings: &Settings,
    prompter: &mut dyn Prompter,
    devices: &[BlockDevice],
    probe: &dyn Fn(&str) -> Result<DeviceProbe>,
    control: &dyn MountControl,
) -> Result<i32> {
    let table = read_table(&settings.fstab_path)?;
    show_table(prompter, &table);
    let live_mounts = read_mounts(&settings.live_mounts_path)?;

    let labels: Vec<String> = devices.iter().map(BlockDevice::menu_label).collect();
    let plan = AttachFlow::new(&live_mounts).run(prompter, |prompter| loop {
        let idx = select_index(prompter, "Block devices:", &labels)?;
        let device = devices[idx].device.to_string_lossy().to_string();
        match probe(&device) {
            Ok(found) => break Ok(found),
            Err(err) => prompter.say(&format!("cannot use {}: {}", device, err)),
        }
    })?;

    let entry = local_entry(&plan);
    info!("adding mount table entry: {}", entry);
    let updated = append_entry(&table, &entry);
    apply_with_rollback(&settings.fstab_path, &updated, control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::fs_type::FsType;
    use crate::error::{BackupToolError, MountError};
    use crate::mount::reconcile::tests::ScriptedMount;
    use crate::settings::test_settings;
    use crate::wizard::tests::ScriptedPrompter;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn devices() -> Vec<BlockDevice> {
        vec![
            BlockDevice {
                device: PathBuf::from("/dev/sdb"),
                size_bytes: Some(1_000_000_000),
                kind: "disk".to_string(),
                fs_type: String::new(),
                mountpoint: None,
            },
            BlockDevice {
                device: PathBuf::from("/dev/sdb1"),
                size_bytes: Some(999_000_000),
                kind: "part".to_string(),
                fs_type: "ext4".to_string(),
                mountpoint: None,
            },
        ]
    }

    fn probe(device: &str) -> Result<DeviceProbe> {
        match device {
            "/dev/sdb1" => Ok(DeviceProbe {
                uuid: "0f3c-uuid".to_string(),
                fs_type: FsType::Ext4,
            }),
            other => Err(BackupToolError::message(format!("{} has no filesystem", other))),
        }
    }

    #[test]
    fn appends_uuid_entry_and_reconciles() {
        let dir = TempDir::new().expect("tempdir");
        let settings = test_settings(dir.path());
        fs::write(&settings.fstab_path, "UUID=root / ext4 defaults 0 1\n").expect("fstab");
        fs::write(&settings.live_mounts_path, "/dev/sda1 / ext4 rw 0 0\n").expect("mounts");
        let mount_point = dir.path().join("data");
        let mount_answer = mount_point.display().to_string();

        let mut prompter = ScriptedPrompter::new(&["1", "2", &mount_answer, "n"]);
        let control = ScriptedMount::new(&[0], None);
        let rc = run_local_mount(&settings, &mut prompter, &devices(), &probe, &control)
            .expect("mount");

        assert_eq!(rc, 0);
        let table = fs::read_to_string(&settings.fstab_path).expect("read");
        assert_eq!(
            table,
            format!(
                "UUID=root / ext4 defaults 0 1\nUUID=0f3c-uuid {} ext4 defaults,rw 0 2\n",
                mount_answer
            )
        );
        assert!(prompter.shown.iter().any(|m| m.starts_with("cannot use /dev/sdb")));
    }

    #[test]
    fn failed_reconcile_leaves_table_as_it_was() {
        let dir = TempDir::new().expect("tempdir");
        let settings = test_settings(dir.path());
        let original = "UUID=root / ext4 defaults 0 1\n";
        fs::write(&settings.fstab_path, original).expect("fstab");
        fs::write(&settings.live_mounts_path, "").expect("mounts");
        let mount_answer = dir.path().join("data").display().to_string();

        let mut prompter = ScriptedPrompter::new(&["2", &mount_answer, "y"]);
        let control = ScriptedMount::new(&[32, 0], None);
        let err = run_local_mount(&settings, &mut prompter, &devices(), &probe, &control)
            .unwrap_err();

        assert!(matches!(err, BackupToolError::Mount(MountError::Reconcile(32))));
        assert_eq!(fs::read_to_string(&settings.fstab_path).expect("read"), original);
        assert_eq!(*control.mount_calls.borrow(), 2);
    }
}
