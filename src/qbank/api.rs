//! # API Facade
//!
//! `QbankApi` is the single entry point for user interfaces. It dispatches
//! to `commands/*` and returns `CmdResult`s; it holds no logic of its own
//! beyond translating 1-based user numbers into visible indexes.
//!
//! `QbankApi<C: Codec>` is generic over the codec:
//! - Production: `QbankApi<CsvCodec>`
//! - Testing: `QbankApi<InMemoryCodec>`

use crate::codec::Codec;
use crate::commands;
use crate::error::{QbankError, Result};
use crate::model::RecordFields;
use crate::store::RecordStore;
use std::path::Path;

pub struct QbankApi<C: Codec> {
    store: RecordStore<C>,
}

impl<C: Codec> QbankApi<C> {
    pub fn new(codec: C) -> Self {
        Self {
            store: RecordStore::new(codec),
        }
    }

    /// Read-only access for presentation (dirty markers, selection, query).
    pub fn store(&self) -> &RecordStore<C> {
        &self.store
    }

    pub fn load(&mut self, source: &Path) -> Result<commands::CmdResult> {
        commands::load::run(&mut self.store, source)
    }

    pub fn filter(&mut self, query: &str) -> Result<commands::CmdResult> {
        commands::filter::run(&mut self.store, query)
    }

    pub fn list(&self) -> Result<commands::CmdResult> {
        commands::filter::list(&self.store)
    }

    /// Selects by 1-based number in the current list.
    pub fn select(&mut self, number: usize) -> Result<commands::CmdResult> {
        let visible = to_visible(number, self.store.view().len())?;
        commands::select::run(&mut self.store, visible)
    }

    pub fn commit_edit(&mut self, fields: RecordFields) -> Result<commands::CmdResult> {
        commands::edit::run(&mut self.store, fields)
    }

    pub fn add(&mut self) -> Result<commands::CmdResult> {
        commands::add::run(&mut self.store)
    }

    pub fn delete_selected(&mut self) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store)
    }

    pub fn save(&mut self, destination: Option<&Path>) -> Result<commands::CmdResult> {
        commands::save::run(&mut self.store, destination)
    }

    pub fn review_prompt(&self) -> Result<commands::CmdResult> {
        commands::prompt::run(&self.store)
    }

    pub fn config(&self, dir: &Path, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(dir, action)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store.has_unsaved_changes()
    }
}

fn to_visible(number: usize, len: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or(QbankError::IndexOutOfRange { index: 0, len })
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};
