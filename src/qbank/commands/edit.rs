use crate::codec::Codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{QbankError, Result};
use crate::model::RecordFields;
use crate::store::{RecordStore, Reselect};

/// Commits `fields` to the selected record.
pub fn run<C: Codec>(store: &mut RecordStore<C>, fields: RecordFields) -> Result<CmdResult> {
    let index = store.selection().ok_or(QbankError::NoSelection)?;
    let outcome = store.commit_edit(fields)?;
    let mut result = CmdResult::default().with_selected(store.selected());

    let message = match (outcome.changed, outcome.reselect) {
        (false, _) => CmdMessage::info("No changes detected to save for this question."),
        (true, Reselect::Lost) => CmdMessage::warning(format!(
            "Question (original index {}) updated, but no longer matches filter.",
            index + 1
        )),
        (true, _) => CmdMessage::success(format!(
            "Question (original index {}) updated in session.",
            index + 1
        )),
    };
    result.add_message(message);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::memory::fixtures::{CodecFixture, BANK_PATH};
    use crate::commands::MessageLevel;
    use std::path::Path;

    fn loaded() -> RecordStore<crate::codec::memory::InMemoryCodec> {
        let mut store = RecordStore::new(CodecFixture::new().with_sample_bank().codec);
        store.load(Path::new(BANK_PATH)).unwrap();
        store
    }

    #[test]
    fn reports_update_in_session() {
        let mut store = loaded();
        store.select(0).unwrap();
        let fields = RecordFields::new("Is the sky grey?", false, "Clouds.", "Ch1");

        let result = run(&mut store, fields.clone()).unwrap();
        assert!(result.has_level(MessageLevel::Success));
        assert_eq!(result.selected.unwrap().record.fields(), fields);
    }

    #[test]
    fn reports_no_change() {
        let mut store = loaded();
        let fields = store.select(1).unwrap().fields();

        let result = run(&mut store, fields).unwrap();
        assert_eq!(
            result.messages[0].content,
            "No changes detected to save for this question."
        );
    }

    #[test]
    fn warns_when_record_leaves_the_filter() {
        let mut store = loaded();
        store.set_filter("water");
        let mut fields = store.select(0).unwrap().fields();
        fields.question = "Is ice cold?".into();

        let result = run(&mut store, fields).unwrap();
        assert!(result.has_level(MessageLevel::Warning));
        assert!(result.selected.is_none());
    }

    #[test]
    fn requires_selection() {
        let mut store = loaded();
        assert!(matches!(
            run(&mut store, RecordFields::default()),
            Err(QbankError::NoSelection)
        ));
    }
}
