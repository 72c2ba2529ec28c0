use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level job configuration, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub version: String,
    pub job: String,
    pub environment: EnvironmentConfig,
    pub people: PeopleConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
    pub groups: GroupsConfig,
    #[serde(default)]
    pub backup: BackupConfig,
}

/// Target directory-notification environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub base_url: String,
    pub subdomain: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeopleConfig {
    /// Path to the people+devices CSV file.
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fields forwarded to the engine for person reconciliation.
    #[serde(default = "default_people_fields")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_device_fields")]
    pub fields: Vec<String>,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fields: default_device_fields(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupsConfig {
    /// Path to the groups CSV file.
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_group_fields")]
    pub fields: Vec<String>,
    /// Only groups whose targetName starts with this prefix are synced.
    pub name_prefix: String,
    /// Marker prepended to the description of groups absent from the
    /// destination.
    #[serde(default = "default_new_marker")]
    pub new_marker: String,
    /// Search term scoping the destination group extraction. Defaults to
    /// `name_prefix` when not set.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_backup_dir")]
    pub dir: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_backup_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_new_marker() -> String {
    "[NEW]".to_string()
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_people_fields() -> Vec<String> {
    [
        "firstName",
        "language",
        "lastName",
        "recipientType",
        "roles",
        "site",
        "status",
        "supervisors",
        "targetName",
        "timezone",
        "webLogin",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_device_fields() -> Vec<String> {
    [
        "deviceType",
        "name",
        "owner",
        "targetName",
        "emailAddress",
        "phoneNumber",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_group_fields() -> Vec<String> {
    ["name", "description"].iter().map(|s| s.to_string()).collect()
}
