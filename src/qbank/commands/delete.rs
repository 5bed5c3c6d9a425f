use crate::codec::Codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;

pub fn run<C: Codec>(store: &mut RecordStore<C>) -> Result<CmdResult> {
    store.delete_selected()?;
    let mut result = CmdResult::default().with_listed(store.visible_records());
    result.add_message(CmdMessage::success(format!(
        "Question deleted. {} questions remaining.",
        store.len()
    )));
    Ok(result)
}
