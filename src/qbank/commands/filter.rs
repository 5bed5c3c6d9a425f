use crate::codec::Codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{RecordStore, Reselect};

/// Applies `query` and returns the resulting list.
pub fn run<C: Codec>(store: &mut RecordStore<C>, query: &str) -> Result<CmdResult> {
    let reselect = store.set_filter(query);
    let mut result = CmdResult::default()
        .with_listed(store.visible_records())
        .with_selected(store.selected());

    if reselect == Reselect::Lost {
        result.add_message(CmdMessage::info(
            "Filtered list. Previous selection no longer visible.",
        ));
    }
    Ok(result)
}

/// The current list, without touching the query.
pub fn list<C: Codec>(store: &RecordStore<C>) -> Result<CmdResult> {
    Ok(CmdResult::default()
        .with_listed(store.visible_records())
        .with_selected(store.selected()))
}
