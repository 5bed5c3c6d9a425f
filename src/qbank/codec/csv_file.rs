use super::{decode_rows, validate_header, AnswerPolicy, Codec, LoadOutcome, FIELD_NAMES};
use crate::error::{QbankError, Result};
use crate::model::{answer_literal, RecordFields};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const BOM: char = '\u{feff}';

/// Reads and writes question banks as comma-separated UTF-8 text.
#[derive(Debug, Clone, Default)]
pub struct CsvCodec {
    policy: AnswerPolicy,
}

impl CsvCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer_policy(mut self, policy: AnswerPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Codec for CsvCodec {
    fn load(&self, source: &Path) -> Result<LoadOutcome> {
        let bytes = fs::read(source).map_err(QbankError::Io)?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| QbankError::Parse(format!("File is not valid UTF-8: {}", e)))?;
        let text = text.strip_prefix(BOM).unwrap_or(text);

        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let header: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();
        validate_header(&header)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let outcome = decode_rows(rows, self.policy)?;
        tracing::debug!(
            path = %source.display(),
            records = outcome.records.len(),
            warnings = outcome.warnings.len(),
            "loaded question bank"
        );
        Ok(outcome)
    }

    fn save(&mut self, destination: &Path, records: &[RecordFields]) -> Result<()> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp_path = dir.join(format!(".qbank-{}.tmp", Uuid::new_v4()));

        let written = write_rows(&tmp_path, records)
            .and_then(|_| fs::rename(&tmp_path, destination).map_err(QbankError::Io));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        tracing::debug!(
            path = %destination.display(),
            records = records.len(),
            "saved question bank"
        );
        Ok(())
    }
}

fn write_rows(path: &Path, records: &[RecordFields]) -> Result<()> {
    let mut writer = ::csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(FIELD_NAMES).map_err(csv_error)?;
    for record in records {
        writer
            .write_record([
                record.question.as_str(),
                answer_literal(record.answer),
                record.explanation.as_str(),
                record.chapter.as_str(),
            ])
            .map_err(csv_error)?;
    }
    writer.flush().map_err(QbankError::Io)?;
    Ok(())
}

fn csv_error(err: ::csv::Error) -> QbankError {
    let message = err.to_string();
    match err.into_kind() {
        ::csv::ErrorKind::Io(e) => QbankError::Io(e),
        _ => QbankError::Parse(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_rows_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bank.csv",
            "question,answer,explanation,chapter\n\
             Is the sky blue?,True,Scattering,Ch1\n\
             \"Is water dry?\",False,\"No, it is wet\",Ch1\n",
        );

        let outcome = CsvCodec::new().load(&path).unwrap();
        assert_eq!(
            outcome.records,
            vec![
                RecordFields::new("Is the sky blue?", true, "Scattering", "Ch1"),
                RecordFields::new("Is water dry?", false, "No, it is wet", "Ch1"),
            ]
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn tolerates_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bom.csv",
            "\u{feff}Question,Answer,Explanation,Chapter\nQ,true,E,C\n",
        );

        let outcome = CsvCodec::new().load(&path).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.records[0].answer);
    }

    #[test]
    fn wrong_header_is_schema_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.csv", "question,answer,notes\nQ,True,N\n");

        let err = CsvCodec::new().load(&path).unwrap_err();
        assert!(matches!(err, QbankError::SchemaMismatch { .. }));
    }

    #[test]
    fn empty_file_is_schema_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.csv", "");

        let err = CsvCodec::new().load(&path).unwrap_err();
        assert!(matches!(err, QbankError::SchemaMismatch { .. }));
    }

    #[test]
    fn ragged_row_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "ragged.csv",
            "question,answer,explanation,chapter\nQ,True\n",
        );

        let err = CsvCodec::new().load(&path).unwrap_err();
        assert!(matches!(err, QbankError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = CsvCodec::new()
            .load(&dir.path().join("nope.csv"))
            .unwrap_err();
        assert!(matches!(err, QbankError::Io(_)));
    }

    #[test]
    fn invalid_answer_is_coerced_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "maybe.csv",
            "question,answer,explanation,chapter\nQ,maybe,E,C\n",
        );

        let outcome = CsvCodec::new().load(&path).unwrap();
        assert!(!outcome.records[0].answer);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].raw, "maybe");
    }

    #[test]
    fn strict_policy_rejects_invalid_answer() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "maybe.csv",
            "question,answer,explanation,chapter\nQ,maybe,E,C\n",
        );

        let codec = CsvCodec::new().with_answer_policy(AnswerPolicy::Strict);
        assert!(matches!(codec.load(&path), Err(QbankError::Parse(_))));
    }

    #[test]
    fn save_then_load_reproduces_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![
            RecordFields::new("Comma, quote \" and\nnewline", true, "E", "Ch1"),
            RecordFields::new("Second", false, "", ""),
        ];

        let mut codec = CsvCodec::new();
        codec.save(&path, &records).unwrap();
        let outcome = codec.load(&path).unwrap();
        assert_eq!(outcome.records, records);

        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.starts_with("question,answer,explanation,chapter"));
        assert!(on_disk.contains(",True,"));
        assert!(on_disk.contains(",False,"));
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        CsvCodec::new()
            .save(&path, &[RecordFields::new("Q", true, "E", "C")])
            .unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let name = entry.unwrap().file_name();
            let name = name.to_string_lossy();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn failed_save_leaves_target_untouched() {
        let dir = TempDir::new().unwrap();
        let missing_dir = dir.path().join("missing").join("out.csv");

        let err = CsvCodec::new()
            .save(&missing_dir, &[RecordFields::new("Q", true, "E", "C")])
            .unwrap_err();
        assert!(matches!(err, QbankError::Io(_)));
        assert!(!missing_dir.exists());
    }
}
