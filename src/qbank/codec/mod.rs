//! # Codec Layer
//!
//! The [`Codec`] trait is the only way question banks reach durable storage.
//! [`crate::store::RecordStore`] is generic over it, the same way the rest of
//! the library never touches files directly.
//!
//! ## Implementations
//!
//! - [`csv_file::CsvCodec`]: production codec for delimited text files
//! - [`memory::InMemoryCodec`]: keeps documents in a map, for tests
//!
//! ## On-disk shape
//!
//! ```text
//! question,answer,explanation,chapter
//! Is the sky blue?,True,Rayleigh scattering.,Ch1
//! ```
//!
//! The header must name exactly these four columns in this order (compared
//! trimmed and case-insensitively). Text fields are trimmed on load. The
//! answer column is decoded by [`parse_answer`] under an [`AnswerPolicy`].
//!
//! Both operations are all-or-nothing: `load` either returns every row or an
//! error, `save` either replaces the destination or leaves it untouched.

use crate::error::{QbankError, Result};
use crate::model::RecordFields;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub mod csv_file;
pub mod memory;

/// Column names, in file order.
pub const FIELD_NAMES: [&str; 4] = ["question", "answer", "explanation", "chapter"];

/// Load/save collaborator for persisted question banks.
pub trait Codec {
    /// Read every row from `source`.
    fn load(&self, source: &Path) -> Result<LoadOutcome>;

    /// Replace `destination` with `records`, in order.
    fn save(&mut self, destination: &Path, records: &[RecordFields]) -> Result<()>;
}

/// What to do with an answer cell that is neither `True` nor `False`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerPolicy {
    /// Import as `false` and report an [`AnswerWarning`].
    #[default]
    Coerce,
    /// Abort the load with a parse error.
    Strict,
}

impl fmt::Display for AnswerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerPolicy::Coerce => write!(f, "coerce"),
            AnswerPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for AnswerPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coerce" => Ok(AnswerPolicy::Coerce),
            "strict" => Ok(AnswerPolicy::Strict),
            other => Err(format!(
                "Invalid answer policy '{}' (expected 'coerce' or 'strict')",
                other
            )),
        }
    }
}

/// A non-fatal note that a row's answer was coerced to `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerWarning {
    /// 1-based data row (the header is not counted).
    pub row: usize,
    pub raw: String,
}

impl fmt::Display for AnswerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Row {}: invalid answer '{}', defaulted to False",
            self.row, self.raw
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<RecordFields>,
    pub warnings: Vec<AnswerWarning>,
}

/// Recognizes the two canonical answer spellings, ignoring case and
/// surrounding whitespace.
pub fn parse_answer(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Fails with `SchemaMismatch` unless `header` names exactly [`FIELD_NAMES`].
pub fn validate_header<S: AsRef<str>>(header: &[S]) -> Result<()> {
    let normalized: Vec<String> = header
        .iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .collect();
    if normalized == FIELD_NAMES {
        return Ok(());
    }
    Err(QbankError::SchemaMismatch {
        expected: FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
        found: header.iter().map(|h| h.as_ref().to_string()).collect(),
    })
}

/// Turns raw data rows (header already validated) into records.
pub fn decode_rows<I>(rows: I, policy: AnswerPolicy) -> Result<LoadOutcome>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut outcome = LoadOutcome::default();

    for (i, row) in rows.into_iter().enumerate() {
        let row_number = i + 1;
        let [question, answer, explanation, chapter]: [String; 4] =
            row.try_into().map_err(|row: Vec<String>| {
                QbankError::Parse(format!(
                    "Row {}: expected {} fields, found {}",
                    row_number,
                    FIELD_NAMES.len(),
                    row.len()
                ))
            })?;

        let answer = match parse_answer(&answer) {
            Some(value) => value,
            None if policy == AnswerPolicy::Strict => {
                return Err(QbankError::Parse(format!(
                    "Row {}: invalid answer '{}'",
                    row_number, answer
                )));
            }
            None => {
                let warning = AnswerWarning {
                    row: row_number,
                    raw: answer,
                };
                tracing::debug!(
                    row = warning.row,
                    raw = %warning.raw,
                    "invalid answer, defaulting to False"
                );
                outcome.warnings.push(warning);
                false
            }
        };

        outcome
            .records
            .push(RecordFields::new(question, answer, explanation, chapter).normalized());
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: [&str; 4]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn parse_answer_accepts_canonical_spellings_any_case() {
        assert_eq!(parse_answer("True"), Some(true));
        assert_eq!(parse_answer(" false "), Some(false));
        assert_eq!(parse_answer("TRUE"), Some(true));
        assert_eq!(parse_answer("maybe"), None);
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("1"), None);
    }

    #[test]
    fn header_match_ignores_case_and_whitespace() {
        assert!(validate_header(&[" Question", "ANSWER ", "explanation", "Chapter"]).is_ok());
    }

    #[test]
    fn header_with_wrong_order_is_rejected() {
        let err = validate_header(&["answer", "question", "explanation", "chapter"]).unwrap_err();
        assert!(matches!(err, QbankError::SchemaMismatch { .. }));
    }

    #[test]
    fn header_with_extra_column_is_rejected() {
        let err = validate_header(&["question", "answer", "explanation", "chapter", "notes"])
            .unwrap_err();
        assert!(matches!(err, QbankError::SchemaMismatch { .. }));
    }

    #[test]
    fn coerce_policy_defaults_invalid_answer_and_warns() {
        let outcome = decode_rows(
            vec![row(["Q1", "maybe", "E", "C"]), row(["Q2", "true", "E", "C"])],
            AnswerPolicy::Coerce,
        )
        .unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert!(!outcome.records[0].answer);
        assert!(outcome.records[1].answer);
        assert_eq!(
            outcome.warnings,
            vec![AnswerWarning {
                row: 1,
                raw: "maybe".into()
            }]
        );
    }

    #[test]
    fn strict_policy_rejects_invalid_answer() {
        let err = decode_rows(vec![row(["Q1", "maybe", "E", "C"])], AnswerPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, QbankError::Parse(msg) if msg.contains("Row 1")));
    }

    #[test]
    fn short_row_is_a_parse_error() {
        let err = decode_rows(vec![vec!["Q".to_string()]], AnswerPolicy::Coerce).unwrap_err();
        assert!(matches!(err, QbankError::Parse(_)));
    }

    #[test]
    fn text_fields_are_trimmed() {
        let outcome = decode_rows(
            vec![row([" Q ", "False", " E\n", "  Ch2"])],
            AnswerPolicy::Coerce,
        )
        .unwrap();
        assert_eq!(outcome.records[0], RecordFields::new("Q", false, "E", "Ch2"));
    }

    #[test]
    fn answer_policy_from_str() {
        assert_eq!("Strict".parse::<AnswerPolicy>(), Ok(AnswerPolicy::Strict));
        assert_eq!("coerce".parse::<AnswerPolicy>(), Ok(AnswerPolicy::Coerce));
        assert!("lenient".parse::<AnswerPolicy>().is_err());
    }
}
