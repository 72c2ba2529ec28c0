//! Shared record and protocol types for rostersync.
//!
//! These mirror the remote directory-notification service's REST schema:
//! optional fields serialize by omission, never as `null`, so that absent
//! source data never overwrites remote state with empty values.

pub mod dictionary;
pub mod records;
pub mod sync;

pub use records::{DeviceRecord, DeviceType, GroupRecord, PersonRecord};
pub use sync::{DirectorySnapshot, GroupQuery, SyncData, SyncMessage, SyncReport};
