use super::{decode_rows, validate_header, AnswerPolicy, Codec, LoadOutcome, FIELD_NAMES};
use crate::error::{QbankError, Result};
use crate::model::{answer_literal, RecordFields};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// An in-memory "file": a header row and raw string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemDocument {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MemDocument {
    /// Encodes records the way a well-formed file would hold them.
    pub fn from_records(records: &[RecordFields]) -> Self {
        Self {
            header: FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
            rows: records
                .iter()
                .map(|r| {
                    vec![
                        r.question.clone(),
                        answer_literal(r.answer).to_string(),
                        r.explanation.clone(),
                        r.chapter.clone(),
                    ]
                })
                .collect(),
        }
    }
}

/// Codec backed by a map of paths to documents. Saves can be made to fail
/// on demand to exercise error paths.
#[derive(Debug, Default)]
pub struct InMemoryCodec {
    documents: HashMap<PathBuf, MemDocument>,
    policy: AnswerPolicy,
    fail_saves: bool,
    saves: usize,
}

impl InMemoryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer_policy(mut self, policy: AnswerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn insert_document(&mut self, path: impl Into<PathBuf>, document: MemDocument) {
        self.documents.insert(path.into(), document);
    }

    pub fn insert_records(&mut self, path: impl Into<PathBuf>, records: &[RecordFields]) {
        self.insert_document(path, MemDocument::from_records(records));
    }

    pub fn document(&self, path: &Path) -> Option<&MemDocument> {
        self.documents.get(path)
    }

    /// While set, every `save` fails with an IO error and writes nothing.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Codec for InMemoryCodec {
    fn load(&self, source: &Path) -> Result<LoadOutcome> {
        let document = self.documents.get(source).ok_or_else(|| {
            QbankError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", source.display()),
            ))
        })?;
        validate_header(&document.header)?;
        decode_rows(document.rows.iter().cloned(), self.policy)
    }

    fn save(&mut self, destination: &Path, records: &[RecordFields]) -> Result<()> {
        if self.fail_saves {
            return Err(QbankError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not writable", destination.display()),
            )));
        }
        self.documents
            .insert(destination.to_path_buf(), MemDocument::from_records(records));
        self.saves += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub const BANK_PATH: &str = "bank.csv";

    /// The three-question bank used throughout the store tests.
    pub fn sample_records() -> Vec<RecordFields> {
        vec![
            RecordFields::new("Is the sky blue?", true, "Rayleigh scattering.", "Ch1"),
            RecordFields::new("Is water dry?", false, "Water is wet.", "Ch1"),
            RecordFields::new("2+2=4?", true, "Arithmetic.", "Ch2"),
        ]
    }

    pub struct CodecFixture {
        pub codec: InMemoryCodec,
    }

    impl Default for CodecFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CodecFixture {
        pub fn new() -> Self {
            Self {
                codec: InMemoryCodec::new(),
            }
        }

        pub fn with_sample_bank(mut self) -> Self {
            self.codec.insert_records(BANK_PATH, &sample_records());
            self
        }

        pub fn with_records(mut self, path: &str, records: &[RecordFields]) -> Self {
            self.codec.insert_records(path, records);
            self
        }

        pub fn with_raw_rows(mut self, path: &str, rows: &[[&str; 4]]) -> Self {
            let document = MemDocument {
                header: FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|c| c.to_string()).collect())
                    .collect(),
            };
            self.codec.insert_document(path, document);
            self
        }
    }
}
