use crate::codec::parse_answer;
use crate::error::{QbankError, Result};
use crate::model::{answer_literal, RecordFields};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

const SECTIONS: [&str; 4] = ["Question", "Answer", "Chapter", "Explanation"];

/// Formats a record as an editor buffer, one `# Heading` per field.
///
/// ```text
/// # Question
/// Is the sky blue?
///
/// # Answer
/// True
/// ...
/// ```
pub fn to_buffer(fields: &RecordFields) -> String {
    format!(
        "# Question\n{}\n\n# Answer\n{}\n\n# Chapter\n{}\n\n# Explanation\n{}\n",
        fields.question,
        answer_literal(fields.answer),
        fields.chapter,
        fields.explanation
    )
}

/// Parses an editor buffer back into fields.
///
/// Lines before the first heading are ignored, unknown `#` lines are kept as
/// text, and missing sections are empty. The answer must be `True` or
/// `False`; an empty answer section means `False`.
pub fn from_buffer(buffer: &str) -> Result<RecordFields> {
    let mut sections: [Vec<&str>; 4] = Default::default();
    let mut current: Option<usize> = None;

    for line in buffer.lines() {
        if let Some(heading) = line.strip_prefix("# ") {
            if let Some(pos) = SECTIONS
                .iter()
                .position(|s| s.eq_ignore_ascii_case(heading.trim()))
            {
                current = Some(pos);
                continue;
            }
        }
        if let Some(pos) = current {
            sections[pos].push(line);
        }
    }

    let text = |pos: usize| sections[pos].join("\n").trim().to_string();
    let raw_answer = text(1);
    let answer = if raw_answer.is_empty() {
        false
    } else {
        parse_answer(&raw_answer).ok_or_else(|| {
            QbankError::Parse(format!(
                "Answer must be True or False, found '{}'",
                raw_answer
            ))
        })?
    };

    Ok(RecordFields::new(text(0), answer, text(3), text(2)))
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in ["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok(fallback.to_string());
        }
    }

    Err(QbankError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    // $EDITOR may carry arguments, e.g. "code --wait".
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| QbankError::Api("Editor command is empty".to_string()))?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| QbankError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(QbankError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(QbankError::Io)
}

/// Opens the editor on `initial` and returns the edited fields.
pub fn edit_fields(initial: &RecordFields) -> Result<RecordFields> {
    let temp_file = env::temp_dir().join(format!("qbank-edit-{}.md", Uuid::new_v4()));
    fs::write(&temp_file, to_buffer(initial)).map_err(QbankError::Io)?;

    let edited = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    from_buffer(&edited?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let fields = RecordFields::new(
            "Is the sky blue?\nOn a clear day.",
            true,
            "Rayleigh scattering.\n\nSee chapter 1.",
            "Ch1",
        );
        assert_eq!(from_buffer(&to_buffer(&fields)).unwrap(), fields);
    }

    #[test]
    fn test_buffer_layout() {
        let buffer = to_buffer(&RecordFields::new("Q", false, "E", "C"));
        assert_eq!(
            buffer,
            "# Question\nQ\n\n# Answer\nFalse\n\n# Chapter\nC\n\n# Explanation\nE\n"
        );
    }

    #[test]
    fn test_sections_in_any_order_and_case() {
        let buffer = "# explanation\nBecause.\n# QUESTION\nWhy?\n# answer\n true \n";
        let fields = from_buffer(buffer).unwrap();
        assert_eq!(fields, RecordFields::new("Why?", true, "Because.", ""));
    }

    #[test]
    fn test_unknown_heading_is_text() {
        let buffer = "# Explanation\nIntro\n# Note\nmore\n";
        let fields = from_buffer(buffer).unwrap();
        assert_eq!(fields.explanation, "Intro\n# Note\nmore");
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(from_buffer("").unwrap(), RecordFields::default());
    }

    #[test]
    fn test_invalid_answer_is_rejected() {
        let err = from_buffer("# Question\nQ\n# Answer\nmaybe\n").unwrap_err();
        assert!(matches!(err, QbankError::Parse(_)));
    }
}
