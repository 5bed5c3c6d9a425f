use crate::codec::Codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;

pub fn run<C: Codec>(store: &mut RecordStore<C>) -> Result<CmdResult> {
    let outcome = store.add_record();
    let mut result = CmdResult::default()
        .with_listed(store.visible_records())
        .with_selected(store.selected());

    match outcome.visible {
        Some(_) => result.add_message(CmdMessage::success(
            "Added new question. Fill details and save.",
        )),
        None => result.add_message(CmdMessage::warning(format!(
            "Added new question (original index {}). Not visible with current filter.",
            outcome.index + 1
        ))),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::memory::fixtures::{CodecFixture, BANK_PATH};
    use crate::commands::MessageLevel;
    use std::path::Path;

    #[test]
    fn selects_new_record_when_visible() {
        let mut store = RecordStore::new(CodecFixture::new().with_sample_bank().codec);
        store.load(Path::new(BANK_PATH)).unwrap();

        let result = run(&mut store).unwrap();
        let selected = result.selected.unwrap();
        assert_eq!(selected.index, 3);
        assert!(selected.record.dirty);
        assert_eq!(result.listed.len(), 4);
    }

    #[test]
    fn warns_when_hidden_by_filter() {
        let mut store = RecordStore::new(CodecFixture::new().with_sample_bank().codec);
        store.load(Path::new(BANK_PATH)).unwrap();
        store.set_filter("blue");

        let result = run(&mut store).unwrap();
        assert!(result.selected.is_none());
        assert!(result.has_level(MessageLevel::Warning));
        assert!(result.messages[0].content.contains("original index 4"));
    }
}
