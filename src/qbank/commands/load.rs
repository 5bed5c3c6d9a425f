use crate::codec::Codec;
use crate::commands::{file_label, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordStore;
use std::path::Path;

pub fn run<C: Codec>(store: &mut RecordStore<C>, source: &Path) -> Result<CmdResult> {
    let report = store.load(source)?;
    let mut result = CmdResult::default().with_listed(store.visible_records());

    for warning in &report.warnings {
        result.add_message(CmdMessage::warning(warning.to_string()));
    }
    result.add_message(CmdMessage::success(format!(
        "Loaded {} questions from {}",
        report.count,
        file_label(source)
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::memory::fixtures::{CodecFixture, BANK_PATH};
    use crate::commands::MessageLevel;
    use crate::error::QbankError;

    #[test]
    fn reports_count_and_lists_everything() {
        let mut store = RecordStore::new(CodecFixture::new().with_sample_bank().codec);
        let result = run(&mut store, Path::new(BANK_PATH)).unwrap();

        assert_eq!(result.listed.len(), 3);
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].content, "Loaded 3 questions from bank.csv");
    }

    #[test]
    fn surfaces_coercion_warnings() {
        let codec = CodecFixture::new()
            .with_raw_rows("maybe.csv", &[["Q", "maybe", "E", "C"]])
            .codec;
        let mut store = RecordStore::new(codec);
        let result = run(&mut store, Path::new("maybe.csv")).unwrap();

        assert!(result.has_level(MessageLevel::Warning));
        assert!(result.messages[0].content.contains("'maybe'"));
    }

    #[test]
    fn propagates_codec_errors() {
        let mut store = RecordStore::new(CodecFixture::new().codec);
        assert!(matches!(
            run(&mut store, Path::new("nope.csv")),
            Err(QbankError::Io(_))
        ));
    }
}
