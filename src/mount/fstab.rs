use std::fmt;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{BackupToolError, Result};

/// One line of the persistent mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FstabEntry {
    pub spec: String,
    pub mount_point: String,
    pub fs_type: String,
    pub options: String,
    pub dump: u8,
    pub pass: u8,
}

impl FstabEntry {
    pub fn parse(line: &str) -> Option<FstabEntry> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 2 {
            return None;
        }
        Some(FstabEntry {
            spec: unescape(fields[0]),
            mount_point: unescape(fields[1]),
            fs_type: fields.get(2).copied().unwrap_or("auto").to_string(),
            options: fields.get(3).copied().unwrap_or("defaults").to_string(),
            dump: fields.get(4).and_then(|v| v.parse().ok()).unwrap_or(0),
            pass: fields.get(5).and_then(|v| v.parse().ok()).unwrap_or(0),
        })
    }
}

impl fmt::Display for FstabEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            escape(&self.spec),
            escape(&self.mount_point),
            self.fs_type,
            self.options,
            self.dump,
            self.pass
        )
    }
}

/// fstab and /proc/mounts encode whitespace as octal escapes.
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\134")
        .replace(' ', "\\040")
        .replace('\t', "\\011")
        .replace('\n', "\\012")
}

pub fn unescape(value: &str) -> String {
    value
        .replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}

/// An entry together with its 1-based line number in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLine {
    pub line_number: usize,
    pub entry: FstabEntry,
}

pub fn list_entries(contents: &str) -> Vec<TableLine> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            FstabEntry::parse(line).map(|entry| TableLine {
                line_number: idx + 1,
                entry,
            })
        })
        .collect()
}

pub fn append_entry(contents: &str, entry: &FstabEntry) -> String {
    let mut out = contents.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&entry.to_string());
    out.push('\n');
    out
}

pub fn remove_line(contents: &str, line_number: usize) -> Result<String> {
    let total = contents.lines().count();
    if line_number == 0 || line_number > total {
        return Err(BackupToolError::message(format!(
            "line {} is outside the mount table ({} lines)",
            line_number, total
        )));
    }
    let mut out = String::with_capacity(contents.len());
    for (idx, line) in contents.lines().enumerate() {
        if idx + 1 == line_number {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    Ok(out)
}

pub fn read_table(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| BackupToolError::message(format!("read {}: {}", path.display(), e)))
}

/// Replaces `path` through a sibling temp file, keeping the old mode.
pub fn write_table(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("/"));
    let mode = fs::metadata(path)
        .map(|meta| meta.permissions().mode())
        .unwrap_or(0o644);
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| BackupToolError::message(format!("create temp in {}: {}", dir.display(), e)))?;
    tmp.write_all(contents)
        .map_err(|e| BackupToolError::message(format!("write {}: {}", tmp.path().display(), e)))?;
    fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode))
        .map_err(|e| BackupToolError::message(format!("chmod {}: {}", tmp.path().display(), e)))?;
    tmp.persist(path)
        .map_err(|e| BackupToolError::message(format!("replace {}: {}", path.display(), e.error)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "# /etc/fstab\nUUID=root-uuid / ext4 errors=remount-ro 0 1\n\n//nas/share /mnt/nas cifs username=me,ro 0 0\n";

    #[test]
    fn entries_keep_file_line_numbers() {
        let entries = list_entries(TABLE);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].line_number, 2);
        assert_eq!(entries[0].entry.mount_point, "/");
        assert_eq!(entries[1].line_number, 4);
        assert_eq!(entries[1].entry.fs_type, "cifs");
    }

    #[test]
    fn entry_line_escapes_spaces() {
        let entry = FstabEntry {
            spec: "UUID=abcd".to_string(),
            mount_point: "/mnt/my disk".to_string(),
            fs_type: "ext4".to_string(),
            options: "defaults,rw".to_string(),
            dump: 0,
            pass: 2,
        };
        assert_eq!(entry.to_string(), "UUID=abcd /mnt/my\\040disk ext4 defaults,rw 0 2");
        assert_eq!(FstabEntry::parse(&entry.to_string()), Some(entry));
    }

    #[test]
    fn append_adds_missing_newline() {
        let entry = FstabEntry::parse("UUID=x /data xfs defaults,ro 0 2").expect("entry");
        assert_eq!(
            append_entry("UUID=y / ext4 defaults 0 1", &entry),
            "UUID=y / ext4 defaults 0 1\nUUID=x /data xfs defaults,ro 0 2\n"
        );
    }

    #[test]
    fn remove_line_by_number() {
        let out = remove_line(TABLE, 4).expect("remove");
        assert!(!out.contains("//nas/share"));
        assert!(out.contains("UUID=root-uuid"));
        assert!(remove_line(TABLE, 0).is_err());
        assert!(remove_line(TABLE, 99).is_err());
    }

    #[test]
    fn write_table_keeps_mode() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("fstab");
        fs::write(&path, "old\n").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");
        write_table(&path, b"new\n").expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "new\n");
        let mode = fs::metadata(&path).expect("meta").permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
