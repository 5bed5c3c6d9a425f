use crate::codec::Codec;
use crate::commands::{file_label, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;
use std::path::Path;

/// Saves to `destination`, or back to the loaded file when `None`.
pub fn run<C: Codec>(store: &mut RecordStore<C>, destination: Option<&Path>) -> Result<CmdResult> {
    let modified = store.dirty_count();
    let saved = match destination {
        Some(path) => store.save_all(path)?,
        None => store.save()?,
    };
    let label = store.source().map(file_label).unwrap_or_default();

    let mut result = CmdResult::default()
        .with_listed(store.visible_records())
        .with_selected(store.selected());
    result.add_message(CmdMessage::success(format!(
        "Saved {} questions ({} modified) to {}",
        saved, modified, label
    )));
    Ok(result)
}
