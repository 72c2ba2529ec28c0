//! Declarative options bundle for a sync run.
//!
//! [`SyncOptions`] is the full bundle, including local callbacks (group
//! filter, group decorator, data-extracted hook). [`WireOptions`] is the
//! serializable subset forwarded to the engine alongside the record
//! collections.

use serde::{Deserialize, Serialize};

use rostersync_types::records::GroupRecord;
use rostersync_types::sync::{DirectorySnapshot, GroupQuery, SyncData};

use crate::config::types::JobConfig;

/// Predicate deciding whether a candidate group is synced at all.
pub type GroupFilter = Box<dyn Fn(&GroupRecord) -> bool + Send + Sync>;

/// Decorator applied to each candidate group after extraction:
/// `(candidate, source data, destination snapshot) -> candidate`.
pub type GroupTransform =
    Box<dyn Fn(GroupRecord, &SyncData, &DirectorySnapshot) -> GroupRecord + Send + Sync>;

/// Hook invoked once the destination snapshot has been extracted, before any
/// write-back. Used to persist a backup of pre-sync remote state.
pub type DataExtractedHook =
    Box<dyn Fn(&DirectorySnapshot, &EnvironmentInfo) -> anyhow::Result<()> + Send + Sync>;

/// Descriptor of the target environment handed to hooks.
#[derive(Debug, Clone)]
pub struct EnvironmentInfo {
    pub subdomain: String,
    pub base_url: String,
}

/// Full options bundle for one run.
pub struct SyncOptions {
    pub people: bool,
    pub devices: bool,
    pub groups: bool,
    pub people_fields: Vec<String>,
    pub device_fields: Vec<String>,
    pub group_fields: Vec<String>,
    pub group_filter: Option<GroupFilter>,
    pub group_transform: Option<GroupTransform>,
    pub groups_query: GroupQuery,
    pub data_extracted: Option<DataExtractedHook>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            people: true,
            devices: true,
            groups: true,
            people_fields: Vec::new(),
            device_fields: Vec::new(),
            group_fields: Vec::new(),
            group_filter: None,
            group_transform: None,
            groups_query: GroupQuery {
                search: String::new(),
            },
            data_extracted: None,
        }
    }
}

impl std::fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOptions")
            .field("people", &self.people)
            .field("devices", &self.devices)
            .field("groups", &self.groups)
            .field("people_fields", &self.people_fields)
            .field("device_fields", &self.device_fields)
            .field("group_fields", &self.group_fields)
            .field("group_filter", &self.group_filter.is_some())
            .field("group_transform", &self.group_transform.is_some())
            .field("groups_query", &self.groups_query)
            .field("data_extracted", &self.data_extracted.is_some())
            .finish()
    }
}

impl SyncOptions {
    /// The serializable subset sent to the engine.
    pub fn wire(&self) -> WireOptions {
        WireOptions {
            people: self.people,
            devices: self.devices,
            groups: self.groups,
            people_fields: self.people_fields.clone(),
            device_fields: self.device_fields.clone(),
            group_fields: self.group_fields.clone(),
            groups_query: self.groups_query.clone(),
        }
    }
}

/// Options forwarded to the engine on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOptions {
    pub people: bool,
    pub devices: bool,
    pub groups: bool,
    pub people_fields: Vec<String>,
    pub device_fields: Vec<String>,
    pub group_fields: Vec<String>,
    pub groups_query: GroupQuery,
}

/// Build the options bundle for a job: entity flags and allow-lists from the
/// config, the prefix filter and new-group decorator for groups, and the
/// snapshot backup hook when enabled.
pub fn build_sync_options(config: &JobConfig) -> SyncOptions {
    let search = config
        .groups
        .search
        .clone()
        .unwrap_or_else(|| config.groups.name_prefix.clone());

    let data_extracted: Option<DataExtractedHook> = if config.backup.enabled {
        let dir = config.backup.dir.clone();
        Some(Box::new(
            move |snapshot: &DirectorySnapshot, env: &EnvironmentInfo| {
                let path = crate::backup::write_snapshot_backup(&dir, &env.subdomain, snapshot)?;
                tracing::info!(path = %path.display(), "Wrote destination snapshot backup");
                Ok(())
            },
        ))
    } else {
        None
    };

    SyncOptions {
        people: config.people.enabled,
        devices: config.devices.enabled,
        groups: config.groups.enabled,
        people_fields: config.people.fields.clone(),
        device_fields: config.devices.fields.clone(),
        group_fields: config.groups.fields.clone(),
        group_filter: Some(crate::groups::prefix_filter(
            config.groups.name_prefix.clone(),
        )),
        group_transform: Some(crate::groups::new_group_decorator(
            config.groups.new_marker.clone(),
        )),
        groups_query: GroupQuery { search },
        data_extracted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::parse_job_str;

    fn job_yaml() -> &'static str {
        r#"
version: "1.0"
job: test
environment:
  base_url: https://acme.example.com
  subdomain: acme
  api_key: secret
people:
  path: ./people.csv
groups:
  path: ./groups.csv
  name_prefix: "Example Group"
backup:
  enabled: false
"#
    }

    #[test]
    fn test_build_options_from_config() {
        let config = parse_job_str(job_yaml()).unwrap();
        let options = build_sync_options(&config);
        assert!(options.people);
        assert!(options.devices);
        assert!(options.groups);
        assert!(options.group_filter.is_some());
        assert!(options.group_transform.is_some());
        assert!(options.data_extracted.is_none());
        assert_eq!(options.groups_query.search, "Example Group");
    }

    #[test]
    fn test_explicit_search_overrides_prefix() {
        let yaml = job_yaml().replace(
            "name_prefix: \"Example Group\"",
            "name_prefix: \"Example Group\"\n  search: \"Example\"",
        );
        let config = parse_job_str(&yaml).unwrap();
        let options = build_sync_options(&config);
        assert_eq!(options.groups_query.search, "Example");
    }

    #[test]
    fn test_backup_enabled_installs_hook() {
        let yaml = job_yaml().replace("enabled: false", "enabled: true");
        let config = parse_job_str(&yaml).unwrap();
        let options = build_sync_options(&config);
        assert!(options.data_extracted.is_some());
    }

    #[test]
    fn test_wire_options_serialize_camel_case() {
        let config = parse_job_str(job_yaml()).unwrap();
        let wire = build_sync_options(&config).wire();
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["people"], true);
        assert!(json["peopleFields"].is_array());
        assert_eq!(json["groupsQuery"]["search"], "Example Group");
    }
}
