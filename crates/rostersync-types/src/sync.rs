//! Request/response contract with the external sync engine.
//!
//! The engine owns diffing and write-back; this side only packages record
//! collections, reads back a snapshot of remote state for the group
//! decoration step, and inspects the report's failure flag.

use serde::{Deserialize, Serialize};

use crate::records::{DeviceRecord, GroupRecord, PersonRecord};

/// The three record collections handed to the engine in one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncData {
    pub people: Vec<PersonRecord>,
    pub groups: Vec<GroupRecord>,
    pub devices: Vec<DeviceRecord>,
}

/// Search parameter scoping the engine's group extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupQuery {
    pub search: String,
}

/// The engine's read of current remote state, taken before write-back.
///
/// People and devices are carried as raw JSON: their remote schema is wider
/// than what this tool writes and is only persisted verbatim in backups.
/// Groups are typed because the decoration step keys on their target names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub people: Vec<serde_json::Value>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub devices: Vec<serde_json::Value>,
}

impl DirectorySnapshot {
    /// True if the snapshot already contains a group with this target name.
    pub fn has_group(&self, target_name: &str) -> bool {
        self.groups.iter().any(|g| g.target_name() == target_name)
    }
}

/// One error message captured by the engine during a failed sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMessage {
    pub message: String,
}

/// Outcome of a sync request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub failure: bool,
    #[serde(default)]
    pub errors: Vec<SyncMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn group(target_name: &str) -> GroupRecord {
        let mut fields = BTreeMap::new();
        fields.insert("targetName".to_string(), target_name.to_string());
        GroupRecord::new(fields)
    }

    #[test]
    fn test_snapshot_has_group() {
        let snapshot = DirectorySnapshot {
            groups: vec![group("Example Group A"), group("Example Group B")],
            ..Default::default()
        };
        assert!(snapshot.has_group("Example Group A"));
        assert!(!snapshot.has_group("Example Group C"));
    }

    #[test]
    fn test_report_deserializes_without_errors_field() {
        let report: SyncReport = serde_json::from_str(r#"{"failure": false}"#).unwrap();
        assert!(!report.failure);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_report_deserializes_failure_with_messages() {
        let report: SyncReport =
            serde_json::from_str(r#"{"failure": true, "errors": [{"message": "bad field"}]}"#)
                .unwrap();
        assert!(report.failure);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].message, "bad field");
    }
}
