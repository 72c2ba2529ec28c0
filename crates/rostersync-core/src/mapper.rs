//! CSV row mapping: one people-file row becomes one [`PersonRecord`], zero to
//! four [`DeviceRecord`]s, and possibly one removal-queue entry.
//!
//! A field is set iff its cell is non-empty after trimming; empty cells leave
//! the field absent entirely. Device emission order is fixed: Work Email,
//! Home Email, SMS Phone, Work Phone.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

use rostersync_types::dictionary;
use rostersync_types::records::{DeviceRecord, DeviceType, PersonRecord};

/// Operation-column value flagging a row for removal.
pub const OPERATION_REMOVE: &str = "remove";

/// Columns the people file must carry for the mapper to run.
pub const REQUIRED_PEOPLE_COLUMNS: &[&str] = &[
    "Operation",
    "User",
    "First Name",
    "Last Name",
    "Language",
    "Time Zone",
    "Role",
    "Site",
    "User Supervisor",
    "Work Email",
    "Home Email",
    "SMS Phone",
    "Work Phone",
];

/// Everything extracted from the people file in one pass.
#[derive(Debug, Default)]
pub struct MappedRoster {
    pub people: Vec<PersonRecord>,
    pub devices: Vec<DeviceRecord>,
    /// Target names queued for deletion, in source order. May contain
    /// duplicates; the sweep deduplicates before dispatch.
    pub removals: Vec<String>,
}

/// Per-row mapping error. Any of these aborts the run before the sync call.
#[derive(Debug, PartialEq, Eq)]
pub enum MapError {
    /// Row has an empty `User` cell, so no natural key can be derived.
    MissingUser { row: usize },
    /// Row names a language with no entry in the code dictionary.
    UnknownLanguage { row: usize, name: String },
    /// The file's header row lacks required columns.
    MissingColumns { columns: Vec<String> },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUser { row } => {
                write!(f, "row {row}: User cell is empty, cannot derive targetName")
            }
            Self::UnknownLanguage { row, name } => {
                write!(f, "row {row}: unknown language name '{name}'")
            }
            Self::MissingColumns { columns } => {
                write!(f, "people file is missing required column(s): {}", columns.join(", "))
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Output of mapping a single row.
#[derive(Debug)]
pub struct MappedRow {
    pub person: PersonRecord,
    pub devices: Vec<DeviceRecord>,
    /// Set when the row's Operation cell equals `remove`.
    pub removal: Option<String>,
}

/// Read and map the whole people file.
///
/// # Errors
///
/// Fails on unreadable or malformed CSV, missing required columns, or any
/// per-row [`MapError`].
pub fn map_people_file(path: &Path) -> Result<MappedRoster> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open people file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read people file headers: {}", path.display()))?
        .clone();
    check_required_columns(&headers)?;

    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect();

    let mut roster = MappedRoster::default();
    for (i, record) in reader.records().enumerate() {
        // Row 1 is the data row right after the header.
        let row_number = i + 1;
        let record = record
            .with_context(|| format!("Failed to read people file row {row_number}"))?;
        let mapped = map_row(row_number, &columns, &record)?;
        roster.people.push(mapped.person);
        roster.devices.extend(mapped.devices);
        roster.removals.extend(mapped.removal);
    }

    Ok(roster)
}

fn check_required_columns(headers: &csv::StringRecord) -> Result<(), MapError> {
    let missing: Vec<String> = REQUIRED_PEOPLE_COLUMNS
        .iter()
        .filter(|name| !headers.iter().any(|h| h.trim() == **name))
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MapError::MissingColumns { columns: missing })
    }
}

/// Map one data row. `row_number` is 1-based and used only for diagnostics.
pub fn map_row(
    row_number: usize,
    columns: &HashMap<String, usize>,
    record: &csv::StringRecord,
) -> Result<MappedRow, MapError> {
    let cell = |name: &str| cell_value(columns, record, name);

    let user = cell("User");
    if user.is_empty() {
        return Err(MapError::MissingUser { row: row_number });
    }

    // The removal queue is independent of the rest of the record.
    let removal = (cell("Operation") == OPERATION_REMOVE).then(|| user.to_string());

    let mut person = PersonRecord::new(user);
    person.web_login = Some(user.to_string());
    person.first_name = optional(cell("First Name"));
    person.last_name = optional(cell("Last Name"));
    person.timezone = optional(cell("Time Zone"));
    person.site = optional(cell("Site"));
    person.roles = optional_list(cell("Role"));
    person.supervisors = optional_list(cell("User Supervisor"));

    let language = cell("Language");
    if !language.is_empty() {
        match dictionary::language_code(language) {
            Some(code) => person.language = Some(code.to_string()),
            None => {
                return Err(MapError::UnknownLanguage {
                    row: row_number,
                    name: language.to_string(),
                })
            }
        }
    }

    // Synced devices, in fixed order: Work Email, Home Email, SMS Phone,
    // Work Phone.
    let mut devices = Vec::new();
    let work_email = cell("Work Email");
    if !work_email.is_empty() {
        devices.push(DeviceRecord::email(user, "Work Email", work_email));
    }
    let home_email = cell("Home Email");
    if !home_email.is_empty() {
        devices.push(DeviceRecord::email(user, "Home Email", home_email));
    }
    let sms_phone = cell("SMS Phone");
    if !sms_phone.is_empty() {
        devices.push(DeviceRecord::phone(user, "SMS Phone", DeviceType::TextPhone, sms_phone));
    }
    let work_phone = cell("Work Phone");
    if !work_phone.is_empty() {
        devices.push(DeviceRecord::phone(user, "Work Phone", DeviceType::Voice, work_phone));
    }

    Ok(MappedRow { person, devices, removal })
}

fn cell_value<'a>(
    columns: &HashMap<String, usize>,
    record: &'a csv::StringRecord,
    name: &str,
) -> &'a str {
    columns
        .get(name)
        .and_then(|&i| record.get(i))
        .map(str::trim)
        .unwrap_or("")
}

fn optional(cell: &str) -> Option<String> {
    (!cell.is_empty()).then(|| cell.to_string())
}

/// Split a `|`-delimited cell into an ordered list, dropping empty segments.
/// A cell of only delimiters yields an absent field.
fn optional_list(cell: &str) -> Option<Vec<String>> {
    if cell.is_empty() {
        return None;
    }
    let items: Vec<String> = cell
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    const HEADER: &str = "Operation,User,First Name,Last Name,Language,Time Zone,Role,Site,User Supervisor,Work Email,Home Email,SMS Phone,Work Phone";

    fn map_csv(rows: &str) -> Result<MappedRoster> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        write!(file, "{rows}").unwrap();
        file.flush().unwrap();
        map_people_file(file.path())
    }

    #[test]
    fn test_full_row_maps_person_and_devices() {
        let roster = map_csv(
            ",jdoe,Jane,Doe,English,US/Eastern,Admin|Operator,HQ,boss1|boss2,jane@x.com,jane@home.com,+15550001,+15550002\n",
        )
        .unwrap();

        assert_eq!(roster.people.len(), 1);
        let person = &roster.people[0];
        assert_eq!(person.target_name, "jdoe");
        assert_eq!(person.recipient_type, "PERSON");
        assert_eq!(person.status, "ACTIVE");
        assert_eq!(person.first_name.as_deref(), Some("Jane"));
        assert_eq!(person.last_name.as_deref(), Some("Doe"));
        assert_eq!(person.language.as_deref(), Some("en"));
        assert_eq!(person.timezone.as_deref(), Some("US/Eastern"));
        assert_eq!(person.web_login.as_deref(), Some("jdoe"));
        assert_eq!(person.site.as_deref(), Some("HQ"));
        assert_eq!(
            person.roles,
            Some(vec!["Admin".to_string(), "Operator".to_string()])
        );
        assert_eq!(
            person.supervisors,
            Some(vec!["boss1".to_string(), "boss2".to_string()])
        );

        assert_eq!(roster.devices.len(), 4);
        let labels: Vec<&str> = roster.devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(labels, ["Work Email", "Home Email", "SMS Phone", "Work Phone"]);
        assert!(roster.removals.is_empty());
    }

    #[test]
    fn test_sparse_row_omits_empty_fields() {
        let roster = map_csv(",jdoe,Jane,,,,,,,jane@x.com,,,\n").unwrap();

        let person = &roster.people[0];
        assert_eq!(person.target_name, "jdoe");
        assert_eq!(person.first_name.as_deref(), Some("Jane"));
        assert_eq!(person.web_login.as_deref(), Some("jdoe"));
        assert!(person.last_name.is_none());
        assert!(person.language.is_none());
        assert!(person.timezone.is_none());
        assert!(person.roles.is_none());
        assert!(person.site.is_none());
        assert!(person.supervisors.is_none());

        assert_eq!(roster.devices.len(), 1);
        let device = &roster.devices[0];
        assert_eq!(device.device_type, DeviceType::Email);
        assert_eq!(device.name, "Work Email");
        assert_eq!(device.owner, "jdoe");
        assert_eq!(device.target_name, "jdoe|Work Email");
        assert_eq!(device.email_address.as_deref(), Some("jane@x.com"));
    }

    #[rstest]
    #[case("Work Email", "jane@x.com,,,", DeviceType::Email, true)]
    #[case("Home Email", ",jane@home.com,,", DeviceType::Email, true)]
    #[case("SMS Phone", ",,+15550001,", DeviceType::TextPhone, false)]
    #[case("Work Phone", ",,,+15550002", DeviceType::Voice, false)]
    fn test_each_device_channel(
        #[case] label: &str,
        #[case] device_cells: &str,
        #[case] device_type: DeviceType,
        #[case] is_email: bool,
    ) {
        let roster = map_csv(&format!(",jdoe,,,,,,,,{device_cells}\n")).unwrap();
        assert_eq!(roster.devices.len(), 1);
        let device = &roster.devices[0];
        assert_eq!(device.name, label);
        assert_eq!(device.device_type, device_type);
        assert_eq!(device.owner, "jdoe");
        assert_eq!(device.target_name, format!("jdoe|{label}"));
        assert_eq!(device.email_address.is_some(), is_email);
        assert_eq!(device.phone_number.is_some(), !is_email);
    }

    #[test]
    fn test_remove_operation_queues_user_even_when_sparse() {
        let roster = map_csv("remove,jdoe,,,,,,,,,,,\n").unwrap();
        assert_eq!(roster.removals, vec!["jdoe".to_string()]);
        // The person record is still produced.
        assert_eq!(roster.people.len(), 1);
    }

    #[test]
    fn test_non_remove_operation_is_ignored() {
        let roster = map_csv("update,jdoe,,,,,,,,,,,\n").unwrap();
        assert!(roster.removals.is_empty());
    }

    #[test]
    fn test_unknown_language_fails_row() {
        let err = map_csv(",jdoe,,,Klingon,,,,,,,,\n").unwrap_err();
        let map_err = err.downcast::<MapError>().unwrap();
        assert_eq!(
            map_err,
            MapError::UnknownLanguage {
                row: 1,
                name: "Klingon".to_string()
            }
        );
    }

    #[test]
    fn test_empty_user_fails_row() {
        let err = map_csv(",jdoe,,,,,,,,,,,\n,,,,,,,,,,,,\n").unwrap_err();
        let map_err = err.downcast::<MapError>().unwrap();
        assert_eq!(map_err, MapError::MissingUser { row: 2 });
    }

    #[test]
    fn test_delimiter_only_role_cell_is_absent() {
        let roster = map_csv(",jdoe,,,,,|,,,,,,\n").unwrap();
        assert!(roster.people[0].roles.is_none());
    }

    #[test]
    fn test_role_with_empty_segment_drops_it() {
        let roster = map_csv(",jdoe,,,,,A||B,,,,,,\n").unwrap();
        assert_eq!(
            roster.people[0].roles,
            Some(vec!["A".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn test_missing_required_column_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Operation,User,First Name").unwrap();
        writeln!(file, ",jdoe,Jane").unwrap();
        file.flush().unwrap();
        let err = map_people_file(file.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing required column"));
        assert!(msg.contains("Work Email"));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = map_people_file(Path::new("/nonexistent/people.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open people file"));
    }
}
