//! Pre-sync snapshot backups.
//!
//! The destination snapshot is the only record of remote state before
//! write-back, so it is persisted before any sync request goes out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};

use rostersync_types::sync::DirectorySnapshot;

/// Write `snapshot` to `<dir>/<subdomain>-<ISO timestamp>.backup.json`,
/// creating `dir` if needed. Returns the path written.
pub fn write_snapshot_backup(
    dir: &Path,
    subdomain: &str,
    snapshot: &DirectorySnapshot,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create backup directory: {}", dir.display()))?;

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let path = dir.join(format!("{subdomain}-{timestamp}.backup.json"));

    let json = serde_json::to_vec(snapshot).context("Failed to serialize snapshot")?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write backup file: {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rostersync_types::records::GroupRecord;
    use std::collections::BTreeMap;

    #[test]
    fn test_backup_written_and_parseable() {
        let dir = tempfile::tempdir().unwrap();
        let mut fields = BTreeMap::new();
        fields.insert("targetName".to_string(), "Example Group A".to_string());
        let snapshot = DirectorySnapshot {
            groups: vec![GroupRecord::new(fields)],
            ..Default::default()
        };

        let path = write_snapshot_backup(dir.path(), "acme", &snapshot).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("acme-"));
        assert!(name.ends_with(".backup.json"));

        let content = std::fs::read(&path).unwrap();
        let restored: DirectorySnapshot = serde_json::from_slice(&content).unwrap();
        assert!(restored.has_group("Example Group A"));
    }

    #[test]
    fn test_backup_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("backups");
        let path =
            write_snapshot_backup(&nested, "acme", &DirectorySnapshot::default()).unwrap();
        assert!(path.exists());
    }
}
