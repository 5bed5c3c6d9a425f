//! # Record Store
//!
//! [`RecordStore`] owns the canonical state of an editing session:
//!
//! - the master list of [`Record`]s, in file order
//! - the persistence snapshot: the fields as last loaded or saved
//! - the active query and the filter view derived from it
//! - the selection: at most one master index, always valid
//!
//! It is a request/response state machine. Every operation runs to
//! completion and reports what happened through its return value; there are
//! no callbacks. The store never reads form contents or asks for
//! confirmation: committing pending edits before `select`/`save_all`, and
//! prompting before destructive actions, is the caller's job.
//!
//! ## Keeping view and selection consistent
//!
//! Any mutation that can change which records are visible (edit, add,
//! delete, save, a new query) ends in [`RecordStore::refresh`]: the view is
//! recomputed and the selection is kept only if the selected record is still
//! visible. The result is reported as a [`Reselect`].
//!
//! ## Dirty tracking
//!
//! ```text
//! clean --(edit that changes a value)--> dirty --(successful save_all)--> clean
//! new record --(add_record)--> dirty
//! ```
//!
//! Load and save replace the snapshot wholesale and only after the codec
//! succeeded, so a failed load or save leaves the store exactly as it was.

use crate::codec::{AnswerWarning, Codec};
use crate::error::{QbankError, Result};
use crate::model::{Record, RecordFields};
use crate::view::{display_records, filter_indices, DisplayRecord};
use std::path::{Path, PathBuf};

/// What happened to the selection after the view was recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reselect {
    /// Nothing was selected.
    Unselected,
    /// The selected record is still visible, now at this visible index.
    Kept(usize),
    /// The selected record dropped out of the view; selection was cleared.
    Lost,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub count: usize,
    pub warnings: Vec<AnswerWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    pub changed: bool,
    pub reselect: Reselect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Master index of the new record.
    pub index: usize,
    /// Visible index, if the new record passes the active filter.
    pub visible: Option<usize>,
}

pub struct RecordStore<C: Codec> {
    codec: C,
    records: Vec<Record>,
    snapshot: Vec<RecordFields>,
    query: String,
    view: Vec<usize>,
    selection: Option<usize>,
    source: Option<PathBuf>,
}

impl<C: Codec> RecordStore<C> {
    /// An empty store with nothing loaded.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            records: Vec::new(),
            snapshot: Vec::new(),
            query: String::new(),
            view: Vec::new(),
            selection: None,
            source: None,
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn codec_mut(&mut self) -> &mut C {
        &mut self.codec
    }

    // --- Queries ---

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fields as last loaded from or saved to disk.
    pub fn snapshot(&self) -> &[RecordFields] {
        &self.snapshot
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Master indexes of the visible records, in order.
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn visible_records(&self) -> Vec<DisplayRecord> {
        display_records(&self.records, &self.view)
    }

    /// Master index of the selected record.
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// The selected record, with its position in the view.
    pub fn selected(&self) -> Option<DisplayRecord> {
        let index = self.selection?;
        let visible = self.view.iter().position(|&i| i == index)?;
        Some(DisplayRecord {
            visible,
            index,
            record: self.records[index].clone(),
        })
    }

    /// Path of the last successful load or save.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn dirty_count(&self) -> usize {
        self.records.iter().filter(|r| r.dirty).count()
    }

    /// True when saving would change what is on disk: a record is dirty, or
    /// records were deleted since the last load/save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty_count() > 0
            || self.records.len() != self.snapshot.len()
            || self
                .records
                .iter()
                .zip(&self.snapshot)
                .any(|(record, persisted)| !record.same_fields(persisted))
    }

    // --- Operations ---

    /// Replaces the whole session with the contents of `source`.
    ///
    /// The codec runs before anything is touched, so on any error the store
    /// keeps its previous records, snapshot, query and selection.
    pub fn load(&mut self, source: &Path) -> Result<LoadReport> {
        let outcome = self.codec.load(source)?;

        let records: Vec<Record> = outcome
            .records
            .iter()
            .cloned()
            .map(|fields| Record::from_fields(fields, false))
            .collect();

        self.snapshot = outcome.records;
        self.records = records;
        self.query.clear();
        self.selection = None;
        self.source = Some(source.to_path_buf());
        self.refresh();

        tracing::debug!(
            path = %source.display(),
            count = self.records.len(),
            "session loaded"
        );
        Ok(LoadReport {
            count: self.records.len(),
            warnings: outcome.warnings,
        })
    }

    /// Stores `query` and recomputes the view. The selection is cleared if
    /// the selected record does not match.
    pub fn set_filter(&mut self, query: &str) -> Reselect {
        self.query = query.to_string();
        self.refresh()
    }

    /// Selects the record at `visible` in the current view.
    pub fn select(&mut self, visible: usize) -> Result<&Record> {
        let index = *self
            .view
            .get(visible)
            .ok_or(QbankError::IndexOutOfRange {
                index: visible,
                len: self.view.len(),
            })?;
        self.selection = Some(index);
        Ok(&self.records[index])
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Replaces the selected record's fields.
    ///
    /// Text fields are trimmed first. If nothing differs the record and its
    /// dirty flag are left alone and `changed` is false. Otherwise the
    /// record is overwritten, marked dirty, and the view is refreshed since
    /// the new question may no longer match the query.
    pub fn commit_edit(&mut self, fields: RecordFields) -> Result<EditOutcome> {
        let index = self.selection.ok_or(QbankError::NoSelection)?;
        let fields = fields.normalized();
        let record = &mut self.records[index];

        if record.same_fields(&fields) {
            let reselect = self.reselect();
            return Ok(EditOutcome {
                changed: false,
                reselect,
            });
        }

        record.assign(fields);
        record.dirty = true;
        tracing::debug!(index, "record edited");

        Ok(EditOutcome {
            changed: true,
            reselect: self.refresh(),
        })
    }

    /// Appends a blank, dirty record and selects it if the filter lets it
    /// through. Otherwise the selection is left cleared.
    pub fn add_record(&mut self) -> AddOutcome {
        self.records.push(Record::blank());
        let index = self.records.len() - 1;
        self.selection = None;
        self.refresh();

        let visible = self.view.iter().position(|&i| i == index);
        if visible.is_some() {
            self.selection = Some(index);
        }
        tracing::debug!(index, visible = visible.is_some(), "record added");
        AddOutcome { index, visible }
    }

    /// Removes the selected record; later records shift down by one.
    pub fn delete_selected(&mut self) -> Result<Record> {
        let index = self.selection.ok_or(QbankError::NoSelection)?;
        let removed = self.records.remove(index);
        self.selection = None;
        self.refresh();
        tracing::debug!(index, remaining = self.records.len(), "record deleted");
        Ok(removed)
    }

    /// Writes every record to `destination` in master order.
    ///
    /// Only after the codec succeeds are dirty flags cleared and the
    /// snapshot replaced. On error nothing changes.
    pub fn save_all(&mut self, destination: &Path) -> Result<usize> {
        let fields: Vec<RecordFields> = self.records.iter().map(Record::fields).collect();
        self.codec.save(destination, &fields)?;

        for record in &mut self.records {
            record.dirty = false;
        }
        self.snapshot = fields;
        self.source = Some(destination.to_path_buf());
        self.refresh();

        Ok(self.snapshot.len())
    }

    /// Saves back to the file last loaded or saved.
    pub fn save(&mut self) -> Result<usize> {
        let destination = self
            .source
            .clone()
            .ok_or_else(|| QbankError::Api("No CSV file loaded or specified to save to".into()))?;
        self.save_all(&destination)
    }

    /// Recomputes the view from the records and the query, then re-resolves
    /// the selection against it.
    pub fn refresh(&mut self) -> Reselect {
        self.view = filter_indices(&self.records, &self.query);
        self.reselect()
    }

    fn reselect(&mut self) -> Reselect {
        let Some(index) = self.selection else {
            return Reselect::Unselected;
        };
        match self.view.iter().position(|&i| i == index) {
            Some(visible) => Reselect::Kept(visible),
            None => {
                self.selection = None;
                Reselect::Lost
            }
        }
    }
}
