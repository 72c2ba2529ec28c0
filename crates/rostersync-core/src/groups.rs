//! Group filter/transform pipeline.
//!
//! Raw group rows pass through three stages in order: field projection to the
//! configured allow-list, a targetName prefix filter, and a decoration step
//! that marks groups absent from the destination snapshot. Decoration runs
//! after the existence check, against the pre-sync snapshot.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use rostersync_types::records::GroupRecord;
use rostersync_types::sync::{DirectorySnapshot, SyncData};

use crate::engine::options::{GroupFilter, GroupTransform, SyncOptions};

/// Read raw group rows from a CSV file. Every column is carried; the
/// allow-list projection happens later in the pipeline.
pub fn load_groups_file(path: &Path) -> Result<Vec<GroupRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open groups file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read groups file headers: {}", path.display()))?
        .clone();

    let mut groups = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("Failed to read groups file row {}", i + 1))?;
        let fields: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.trim().to_string(), v.trim().to_string()))
            .collect();
        groups.push(GroupRecord::new(fields));
    }

    Ok(groups)
}

/// Run the projection -> filter -> transform pipeline over raw group rows.
pub fn prepare_groups(
    raw: Vec<GroupRecord>,
    options: &SyncOptions,
    source: &SyncData,
    destination: &DirectorySnapshot,
) -> Vec<GroupRecord> {
    raw.into_iter()
        .map(|g| g.project(&options.group_fields))
        .filter(|g| options.group_filter.as_ref().map_or(true, |f| f(g)))
        .map(|g| match &options.group_transform {
            Some(transform) => transform(g, source, destination),
            None => g,
        })
        .collect()
}

/// Filter predicate keeping only groups whose targetName starts with `prefix`.
pub fn prefix_filter(prefix: String) -> GroupFilter {
    Box::new(move |g: &GroupRecord| g.target_name().starts_with(&prefix))
}

/// Decorator prepending `marker` to the description of any group absent from
/// the destination snapshot.
///
/// Idempotent: a description already carrying the marker is left alone, so
/// re-running against an unchanged destination never stacks markers.
pub fn new_group_decorator(marker: String) -> GroupTransform {
    Box::new(
        move |mut group: GroupRecord, _source: &SyncData, destination: &DirectorySnapshot| {
            if !destination.has_group(group.target_name())
                && !group.description().starts_with(&marker)
            {
                group.set_description(format!("{marker} {}", group.description()));
            }
            group
        },
    )
}
