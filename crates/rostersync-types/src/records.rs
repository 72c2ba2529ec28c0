//! REST record shapes for people, devices, and groups.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Recipient kind constant for person records.
pub const RECIPIENT_TYPE_PERSON: &str = "PERSON";

/// Status constant for person records.
pub const STATUS_ACTIVE: &str = "ACTIVE";

/// A person in the remote directory, keyed by `target_name`.
///
/// Optional fields are populated only when the source cell was non-empty and
/// are omitted from the serialized form entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub recipient_type: String,
    pub target_name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// ISO language code, resolved from the source language name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisors: Option<Vec<String>>,
}

impl PersonRecord {
    /// Create an active person record with only the natural key set.
    pub fn new(target_name: impl Into<String>) -> Self {
        Self {
            recipient_type: RECIPIENT_TYPE_PERSON.to_string(),
            target_name: target_name.into(),
            status: STATUS_ACTIVE.to_string(),
            first_name: None,
            last_name: None,
            language: None,
            timezone: None,
            web_login: None,
            roles: None,
            site: None,
            supervisors: None,
        }
    }
}

/// Notification channel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Email,
    TextPhone,
    Voice,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Email => "EMAIL",
            Self::TextPhone => "TEXT_PHONE",
            Self::Voice => "VOICE",
        };
        f.write_str(s)
    }
}

/// A notification device owned by a person.
///
/// `target_name` is always `"{owner}|{name}"`, making the key derivable and
/// unique per person+channel. Exactly one of `email_address` / `phone_number`
/// is set, matching `device_type`; use [`DeviceRecord::email`] or
/// [`DeviceRecord::phone`] to keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub device_type: DeviceType,
    /// Fixed channel label, e.g. "Work Email".
    pub name: String,
    /// The owning person's target name.
    pub owner: String,
    pub target_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl DeviceRecord {
    /// Create an EMAIL device for `owner` under the channel label `name`.
    pub fn email(owner: &str, name: &str, address: impl Into<String>) -> Self {
        Self {
            device_type: DeviceType::Email,
            name: name.to_string(),
            owner: owner.to_string(),
            target_name: format!("{owner}|{name}"),
            email_address: Some(address.into()),
            phone_number: None,
        }
    }

    /// Create a phone device (TEXT_PHONE or VOICE) for `owner`.
    pub fn phone(
        owner: &str,
        name: &str,
        device_type: DeviceType,
        number: impl Into<String>,
    ) -> Self {
        Self {
            device_type,
            name: name.to_string(),
            owner: owner.to_string(),
            target_name: format!("{owner}|{name}"),
            email_address: None,
            phone_number: Some(number.into()),
        }
    }
}

/// A group row, carried as an ordered field map.
///
/// Group columns are whatever the source CSV provides; the sync configuration
/// narrows them with an allow-list rather than this type enumerating them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupRecord {
    fields: BTreeMap<String, String>,
}

impl GroupRecord {
    pub const TARGET_NAME: &'static str = "targetName";
    pub const DESCRIPTION: &'static str = "description";

    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// The group's natural key, empty if the column is missing.
    pub fn target_name(&self) -> &str {
        self.get(Self::TARGET_NAME).unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.get(Self::DESCRIPTION).unwrap_or("")
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.set(Self::DESCRIPTION, description);
    }

    /// Keep only the fields named in `allow_list`, preserving `targetName`
    /// so downstream filtering and decoration keep their key.
    pub fn project(&self, allow_list: &[String]) -> Self {
        let fields = self
            .fields
            .iter()
            .filter(|(k, _)| {
                k.as_str() == Self::TARGET_NAME
                    || allow_list.iter().any(|a| a.as_str() == k.as_str())
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { fields }
    }
}
