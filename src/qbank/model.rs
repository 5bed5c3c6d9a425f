use serde::{Deserialize, Serialize};

/// The persisted shape of a question: the four columns of the CSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub question: String,
    pub answer: bool,
    pub explanation: String,
    pub chapter: String,
}

impl RecordFields {
    pub fn new(
        question: impl Into<String>,
        answer: bool,
        explanation: impl Into<String>,
        chapter: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer,
            explanation: explanation.into(),
            chapter: chapter.into(),
        }
    }

    /// Trims surrounding whitespace from the text fields.
    pub fn normalized(self) -> Self {
        Self {
            question: self.question.trim().to_string(),
            answer: self.answer,
            explanation: self.explanation.trim().to_string(),
            chapter: self.chapter.trim().to_string(),
        }
    }
}

/// A question held in memory, with its unsaved-changes marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub question: String,
    pub answer: bool,
    pub explanation: String,
    pub chapter: String,
    pub dirty: bool,
}

impl Record {
    /// A freshly created record: empty text, `false`, never persisted.
    pub fn blank() -> Self {
        Self::from_fields(RecordFields::default(), true)
    }

    pub fn from_fields(fields: RecordFields, dirty: bool) -> Self {
        Self {
            question: fields.question,
            answer: fields.answer,
            explanation: fields.explanation,
            chapter: fields.chapter,
            dirty,
        }
    }

    pub fn fields(&self) -> RecordFields {
        RecordFields {
            question: self.question.clone(),
            answer: self.answer,
            explanation: self.explanation.clone(),
            chapter: self.chapter.clone(),
        }
    }

    pub fn same_fields(&self, fields: &RecordFields) -> bool {
        self.question == fields.question
            && self.answer == fields.answer
            && self.explanation == fields.explanation
            && self.chapter == fields.chapter
    }

    /// Overwrites all four fields, leaving `dirty` alone.
    pub fn assign(&mut self, fields: RecordFields) {
        self.question = fields.question;
        self.answer = fields.answer;
        self.explanation = fields.explanation;
        self.chapter = fields.chapter;
    }
}

/// Canonical spelling of an answer, as written to disk and shown to users.
pub fn answer_literal(answer: bool) -> &'static str {
    if answer {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_record_is_dirty_and_false() {
        let record = Record::blank();
        assert!(record.dirty);
        assert!(!record.answer);
        assert!(record.question.is_empty());
    }

    #[test]
    fn normalized_trims_text_only() {
        let fields = RecordFields::new("  Q? \n", true, "\tE ", " Ch1 ").normalized();
        assert_eq!(fields, RecordFields::new("Q?", true, "E", "Ch1"));
    }

    #[test]
    fn same_fields_compares_all_four() {
        let record = Record::from_fields(RecordFields::new("Q", true, "E", "C"), false);
        assert!(record.same_fields(&RecordFields::new("Q", true, "E", "C")));
        assert!(!record.same_fields(&RecordFields::new("Q", false, "E", "C")));
        assert!(!record.same_fields(&RecordFields::new("Q", true, "E", "C2")));
    }
}
