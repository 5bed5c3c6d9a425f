//! # Filter View
//!
//! The list a user sees is a projection of the master record list: the
//! positions of every record whose question contains the search query,
//! case-insensitively, in master order.
//!
//! Two index spaces are in play and must not be confused:
//!
//! - **master index**: position in [`crate::store::RecordStore::records`]. This is a
//!   record's identity; deleting a record shifts every later master index down.
//! - **visible index**: position in the current view. This is what users
//!   point at. The CLI shows it 1-based.
//!
//! The view is never edited in place. It is recomputed wholesale from the
//! records and the query whenever either may have changed.

use crate::model::Record;

/// Normalizes a raw query the way matching expects it.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether `record` passes an already-normalized query. The empty query
/// matches everything.
pub fn matches_query(record: &Record, normalized: &str) -> bool {
    normalized.is_empty() || record.question.to_lowercase().contains(normalized)
}

/// Master indexes of the records matching `query`, in master order.
pub fn filter_indices(records: &[Record], query: &str) -> Vec<usize> {
    let normalized = normalize_query(query);
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_query(record, &normalized))
        .map(|(i, _)| i)
        .collect()
}

/// A record as it appears in the filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    /// 0-based position in the view.
    pub visible: usize,
    /// 0-based position in the master list.
    pub index: usize,
    pub record: Record,
}

impl DisplayRecord {
    /// 1-based position shown to users.
    pub fn number(&self) -> usize {
        self.visible + 1
    }
}

/// Pairs each entry of `view` with its record.
pub fn display_records(records: &[Record], view: &[usize]) -> Vec<DisplayRecord> {
    view.iter()
        .enumerate()
        .map(|(visible, &index)| DisplayRecord {
            visible,
            index,
            record: records[index].clone(),
        })
        .collect()
}
