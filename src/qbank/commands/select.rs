use crate::codec::Codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;

pub fn run<C: Codec>(store: &mut RecordStore<C>, visible: usize) -> Result<CmdResult> {
    store.select(visible)?;
    let selected = store.selected();

    let mut result = CmdResult::default();
    if let Some(dr) = &selected {
        result.add_message(CmdMessage::info(format!(
            "Displaying question {} (of filtered list). Original index: {}",
            dr.number(),
            dr.index + 1
        )));
    }
    Ok(result.with_selected(selected))
}
