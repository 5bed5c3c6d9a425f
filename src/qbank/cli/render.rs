//! # Rendering
//!
//! Turns `CmdResult` pieces into terminal text. Every function returns a
//! `String` so the one-shot commands and the shell share the same output,
//! and tests can compare plain text by passing `color = false`.
//!
//! Width math is done on display columns (unicode-width), not bytes.

use colored::{ColoredString, Colorize};
use qbank::api::{CmdMessage, MessageLevel};
use qbank::model::answer_literal;
use qbank::view::DisplayRecord;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const DIRTY_MARKER: &str = "* ";
pub const SELECTED_MARKER: &str = ">";
pub const EMPTY_QUESTION: &str = "<New Question>";
const ELLIPSIS: &str = "...";
const RULE: &str = "--------------------------------";

fn paint(text: &str, color: bool, style: impl Fn(&str) -> ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// One line per visible record:
///
/// ```text
/// > 2. * Is water wet?
/// ```
///
/// The selection marker and number take a fixed gutter; the question
/// preview (first line only) is cut to `width` columns.
pub fn render_list(
    records: &[DisplayRecord],
    selection: Option<usize>,
    width: usize,
    color: bool,
) -> String {
    if records.is_empty() {
        return "No questions found.\n".to_string();
    }

    let number_width = records.len().to_string().len();
    let mut output = String::new();

    for dr in records {
        let marker = if selection == Some(dr.index) {
            SELECTED_MARKER
        } else {
            " "
        };
        let number = format!("{:>w$}.", dr.number(), w = number_width);
        let dirty = if dr.record.dirty { DIRTY_MARKER } else { "" };
        let preview = preview(&dr.record.question, width.saturating_sub(dirty.width()));

        output.push_str(&format!(
            "{} {} {}{}\n",
            paint(marker, color, |s| s.bold()),
            paint(&number, color, |s| s.yellow()),
            paint(dirty, color, |s| s.red()),
            if dr.record.question.trim().is_empty() {
                paint(&preview, color, |s| s.dimmed())
            } else {
                preview
            },
        ));
    }

    output
}

/// Question preview for list rows: first line, `<New Question>` when
/// empty, truncated with `...` to fit `width` columns.
pub fn preview(question: &str, width: usize) -> String {
    let first_line = question.trim().lines().next().unwrap_or("");
    if first_line.is_empty() {
        return EMPTY_QUESTION.to_string();
    }
    truncate_to_width(first_line, width)
}

/// Full view of one record.
pub fn render_record(dr: &DisplayRecord, color: bool) -> String {
    let record = &dr.record;
    let mut header = format!(
        "Question {} (original index {})",
        dr.number(),
        dr.index + 1
    );
    if record.dirty {
        header.push_str(" [modified]");
    }

    let chapter = if record.chapter.is_empty() {
        "-"
    } else {
        record.chapter.as_str()
    };

    let mut output = String::new();
    output.push_str(&paint(&header, color, |s| s.bold()));
    output.push('\n');
    output.push_str(RULE);
    output.push('\n');
    output.push_str(&format!("Question:    {}\n", record.question));
    output.push_str(&format!(
        "Answer:      {}\n",
        paint(answer_literal(record.answer), color, |s| s.cyan())
    ));
    output.push_str(&format!("Chapter:     {}\n", chapter));
    output.push_str("Explanation:\n");
    if !record.explanation.is_empty() {
        output.push_str(&record.explanation);
        output.push('\n');
    }
    output
}

pub fn render_messages(messages: &[CmdMessage], color: bool) -> String {
    messages
        .iter()
        .map(|message| {
            let line = match message.level {
                MessageLevel::Info => paint(&message.content, color, |s| s.dimmed()),
                MessageLevel::Success => paint(&message.content, color, |s| s.green()),
                MessageLevel::Warning => paint(&message.content, color, |s| s.yellow()),
                MessageLevel::Error => paint(&message.content, color, |s| s.red()),
            };
            format!("{}\n", line)
        })
        .collect()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let limit = max_width.saturating_sub(ELLIPSIS.len());
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }

    result.push_str(ELLIPSIS);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbank::model::{Record, RecordFields};

    fn display(visible: usize, index: usize, question: &str, dirty: bool) -> DisplayRecord {
        DisplayRecord {
            visible,
            index,
            record: Record::from_fields(
                RecordFields::new(question, true, "Because.", "Ch1"),
                dirty,
            ),
        }
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_list(&[], None, 80, false), "No questions found.\n");
    }

    #[test]
    fn test_render_list_marks_dirty_and_selected() {
        let records = vec![
            display(0, 0, "Is the sky blue?", false),
            display(1, 2, "2+2=4?", true),
        ];
        let output = render_list(&records, Some(2), 80, false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "  1. Is the sky blue?");
        assert_eq!(lines[1], "> 2. * 2+2=4?");
    }

    #[test]
    fn test_render_list_pads_numbers() {
        let records: Vec<DisplayRecord> = (0..10).map(|i| display(i, i, "Q", false)).collect();
        let output = render_list(&records, None, 80, false);
        assert!(output.starts_with("   1. Q\n"));
        assert!(output.ends_with("  10. Q\n"));
    }

    #[test]
    fn test_preview_empty_question() {
        assert_eq!(preview("   ", 80), EMPTY_QUESTION);
    }

    #[test]
    fn test_preview_truncates_with_ellipsis() {
        assert_eq!(preview("abcdefghij", 8), "abcde...");
        assert_eq!(preview("abcdefgh", 8), "abcdefgh");
    }

    #[test]
    fn test_preview_counts_display_columns() {
        // Each CJK character is two columns wide.
        assert_eq!(preview("日本語のテキスト", 9), "日本語...");
    }

    #[test]
    fn test_preview_uses_first_line() {
        assert_eq!(preview("First line\nsecond", 80), "First line");
    }

    #[test]
    fn test_render_record() {
        let output = render_record(&display(0, 3, "2+2=4?", true), false);
        assert!(output.starts_with("Question 1 (original index 4) [modified]\n"));
        assert!(output.contains("Answer:      True\n"));
        assert!(output.contains("Chapter:     Ch1\n"));
        assert!(output.ends_with("Explanation:\nBecause.\n"));
    }

    #[test]
    fn test_render_messages_plain() {
        let messages = vec![CmdMessage::success("Saved"), CmdMessage::warning("Careful")];
        assert_eq!(render_messages(&messages, false), "Saved\nCareful\n");
    }
}
