//! # Interactive Shell
//!
//! A line-oriented editing session over one `QbankApi`. It plays the part
//! of an edit form: selecting a question copies its fields into a *draft*,
//! `set`/`answer` change the draft, and `commit` writes it to the store.
//!
//! Pending draft changes are committed automatically before anything that
//! would move away from the record (`select`, `filter`, `add`, `save`,
//! `prompt`).
//! `quit` and `load` refuse to drop unsaved work unless written as `quit!`
//! and `load!`.
//!
//! Output is accumulated per command into a `String` so command errors are
//! reported and the session carries on; only I/O on the terminal itself
//! ends the loop.

use super::render::{render_list, render_messages, render_record, EMPTY_QUESTION};
use qbank::api::{CmdResult, QbankApi};
use qbank::clipboard::copy_to_clipboard;
use qbank::codec::{parse_answer, Codec};
use qbank::error::{QbankError, Result};
use qbank::model::{Record, RecordFields};
use qbank::view::DisplayRecord;
use std::io::{BufRead, Write};
use std::path::Path;

const HELP: &str = "\
Commands:
  list | ls                 show the (filtered) list
  filter [TEXT]             filter by question text; no text clears the filter
  select N | s N | N        select question N of the list
  show                      show the selected question (with pending edits)
  set FIELD TEXT            change question, explanation or chapter
  answer true|false         change the answer
  commit                    apply pending edits to the session
  revert                    drop pending edits
  add                       add a blank question
  delete | delete!          delete the selected question (! skips confirmation)
  save [PATH]               write all questions (to PATH, or the loaded file)
  load[!] PATH              load a file, discarding the session
  prompt [copy]             print (or copy) a review prompt for the selection
  status                    file, counts and filter
  quit | quit!              leave (! discards unsaved changes)
";

#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    pub preview_width: usize,
    pub color: bool,
    /// Print the `qbank> ` prompt and banner.
    pub interactive: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    ConfirmDelete(String),
    Quit,
}

struct Shell<'a, C: Codec> {
    api: &'a mut QbankApi<C>,
    draft: Option<RecordFields>,
    options: ShellOptions,
}

pub fn run<C: Codec, R: BufRead, W: Write>(
    api: &mut QbankApi<C>,
    input: R,
    out: &mut W,
    options: ShellOptions,
) -> Result<()> {
    let mut shell = Shell::new(api, options);
    let mut lines = input.lines();

    if options.interactive {
        writeln!(out, "Type `help` for commands.")?;
    }

    loop {
        if options.interactive {
            write!(out, "qbank> ")?;
            out.flush()?;
        }
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        let mut buffer = String::new();
        let flow = shell.execute(line.trim(), &mut buffer);
        out.write_all(buffer.as_bytes())?;

        match flow {
            Flow::Continue => {}
            Flow::Quit => break,
            Flow::ConfirmDelete(question) => {
                write!(out, "Delete '{}'? [y/N] ", question)?;
                out.flush()?;
                let answer = match lines.next() {
                    Some(line) => line?,
                    None => break,
                };
                let mut buffer = String::new();
                if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                    shell.delete(&mut buffer);
                } else {
                    buffer.push_str("Delete cancelled.\n");
                }
                out.write_all(buffer.as_bytes())?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

impl<'a, C: Codec> Shell<'a, C> {
    fn new(api: &'a mut QbankApi<C>, options: ShellOptions) -> Self {
        let draft = api.store().selected().map(|dr| dr.record.fields());
        Self {
            api,
            draft,
            options,
        }
    }

    fn execute(&mut self, line: &str, out: &mut String) -> Flow {
        match self.dispatch(line, out) {
            Ok(flow) => flow,
            Err(e) => {
                out.push_str(&format!("Error: {}\n", e));
                Flow::Continue
            }
        }
    }

    fn dispatch(&mut self, line: &str, out: &mut String) -> Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        if let Ok(number) = command.parse::<usize>() {
            self.select(number, out)?;
            return Ok(Flow::Continue);
        }

        match command {
            "help" | "?" => out.push_str(HELP),
            "list" | "ls" => self.list(out)?,
            "filter" | "search" => self.filter(rest, out)?,
            "select" | "s" => self.select(parse_number(rest)?, out)?,
            "show" => self.show(out)?,
            "set" => self.set(rest)?,
            "answer" => self.set_answer(rest)?,
            "commit" => self.commit(out)?,
            "revert" => self.revert(out)?,
            "add" | "new" => self.add(out)?,
            "delete" | "rm" => return self.request_delete(),
            "delete!" | "rm!" => self.delete(out),
            "save" => self.save(rest, out)?,
            "load" => self.load(rest, false, out)?,
            "load!" => self.load(rest, true, out)?,
            "prompt" => self.prompt(rest, out)?,
            "status" => self.status(out),
            "quit" | "exit" | "q" => {
                if self.has_unsaved_work() {
                    out.push_str(
                        "There are unsaved changes. Use `save`, or `quit!` to discard them.\n",
                    );
                } else {
                    return Ok(Flow::Quit);
                }
            }
            "quit!" | "exit!" | "q!" => return Ok(Flow::Quit),
            other => {
                return Err(QbankError::Api(format!(
                    "Unknown command '{}'. Type `help` for commands.",
                    other
                )))
            }
        }
        Ok(Flow::Continue)
    }

    fn print(&self, result: &CmdResult, out: &mut String) {
        out.push_str(&render_messages(&result.messages, self.options.color));
    }

    fn print_list(&self, records: &[DisplayRecord], out: &mut String) {
        out.push_str(&render_list(
            records,
            self.api.store().selection(),
            self.options.preview_width,
            self.options.color,
        ));
    }

    /// Re-reads the draft from the current selection.
    fn sync_draft(&mut self) {
        self.draft = self.api.store().selected().map(|dr| dr.record.fields());
    }

    /// The draft, if it differs from the selected record.
    fn pending_draft(&self) -> Option<RecordFields> {
        let draft = self.draft.clone()?.normalized();
        let selected = self.api.store().selected()?;
        if selected.record.same_fields(&draft) {
            None
        } else {
            Some(draft)
        }
    }

    fn has_unsaved_work(&self) -> bool {
        self.api.has_unsaved_changes() || self.pending_draft().is_some()
    }

    /// Commits pending draft edits, reporting only when something changed.
    fn flush_draft(&mut self, out: &mut String) -> Result<()> {
        if let Some(draft) = self.pending_draft() {
            let result = self.api.commit_edit(draft)?;
            self.print(&result, out);
        }
        self.sync_draft();
        Ok(())
    }

    fn draft_mut(&mut self) -> Result<&mut RecordFields> {
        self.draft.as_mut().ok_or(QbankError::NoSelection)
    }

    fn list(&mut self, out: &mut String) -> Result<()> {
        let result = self.api.list()?;
        self.print_list(&result.listed, out);
        Ok(())
    }

    fn filter(&mut self, query: &str, out: &mut String) -> Result<()> {
        self.flush_draft(out)?;
        let result = self.api.filter(query)?;
        self.sync_draft();
        self.print_list(&result.listed, out);
        self.print(&result, out);
        Ok(())
    }

    fn select(&mut self, number: usize, out: &mut String) -> Result<()> {
        self.flush_draft(out)?;
        let result = self.api.select(number)?;
        self.sync_draft();
        self.print(&result, out);
        if let Some(dr) = &result.selected {
            out.push_str(&render_record(dr, self.options.color));
        }
        Ok(())
    }

    fn show(&mut self, out: &mut String) -> Result<()> {
        let selected = self.api.store().selected().ok_or(QbankError::NoSelection)?;
        let pending = self.pending_draft();
        let shown = match &pending {
            Some(draft) => DisplayRecord {
                record: Record::from_fields(draft.clone(), true),
                ..selected
            },
            None => selected,
        };
        out.push_str(&render_record(&shown, self.options.color));
        if pending.is_some() {
            out.push_str("(uncommitted edits; `commit` or `revert`)\n");
        }
        Ok(())
    }

    fn set(&mut self, rest: &str) -> Result<()> {
        let (field, value) = match rest.split_once(char::is_whitespace) {
            Some((field, value)) => (field, value.trim()),
            None => (rest, ""),
        };
        match field.to_lowercase().as_str() {
            "question" | "q" => self.draft_mut()?.question = value.to_string(),
            "explanation" | "e" => self.draft_mut()?.explanation = value.to_string(),
            "chapter" | "c" => self.draft_mut()?.chapter = value.to_string(),
            "answer" | "a" => self.set_answer(value)?,
            other => {
                return Err(QbankError::Api(format!(
                    "Unknown field '{}'. Use question, answer, explanation or chapter.",
                    other
                )))
            }
        }
        Ok(())
    }

    fn set_answer(&mut self, value: &str) -> Result<()> {
        let answer = parse_answer(value).ok_or_else(|| {
            QbankError::Api(format!("Answer must be True or False, found '{}'", value))
        })?;
        self.draft_mut()?.answer = answer;
        Ok(())
    }

    fn commit(&mut self, out: &mut String) -> Result<()> {
        let draft = self.draft.clone().ok_or(QbankError::NoSelection)?;
        let result = self.api.commit_edit(draft)?;
        self.sync_draft();
        self.print(&result, out);
        Ok(())
    }

    fn revert(&mut self, out: &mut String) -> Result<()> {
        if self.draft.is_none() {
            return Err(QbankError::NoSelection);
        }
        self.sync_draft();
        out.push_str("Pending edits dropped.\n");
        Ok(())
    }

    fn add(&mut self, out: &mut String) -> Result<()> {
        self.flush_draft(out)?;
        let result = self.api.add()?;
        self.sync_draft();
        self.print(&result, out);
        Ok(())
    }

    fn request_delete(&mut self) -> Result<Flow> {
        let selected = self.api.store().selected().ok_or(QbankError::NoSelection)?;
        let question = if selected.record.question.is_empty() {
            EMPTY_QUESTION.to_string()
        } else {
            selected.record.question
        };
        Ok(Flow::ConfirmDelete(question))
    }

    fn delete(&mut self, out: &mut String) {
        match self.api.delete_selected() {
            Ok(result) => {
                self.draft = None;
                self.print(&result, out);
            }
            Err(e) => out.push_str(&format!("Error: {}\n", e)),
        }
    }

    fn save(&mut self, path: &str, out: &mut String) -> Result<()> {
        self.flush_draft(out)?;
        let destination = (!path.is_empty()).then(|| Path::new(path));
        let result = self.api.save(destination)?;
        self.print(&result, out);
        Ok(())
    }

    fn load(&mut self, path: &str, force: bool, out: &mut String) -> Result<()> {
        if path.is_empty() {
            return Err(QbankError::Api("Usage: load PATH".into()));
        }
        if !force && self.has_unsaved_work() {
            out.push_str(
                "There are unsaved changes. Use `save` first, or `load!` to discard them.\n",
            );
            return Ok(());
        }
        let result = self.api.load(Path::new(path))?;
        self.draft = None;
        self.print(&result, out);
        Ok(())
    }

    fn prompt(&mut self, rest: &str, out: &mut String) -> Result<()> {
        self.flush_draft(out)?;
        let result = self.api.review_prompt()?;
        self.print(&result, out);
        let prompt = result.prompt.unwrap_or_default();

        if rest == "copy" {
            copy_to_clipboard(&prompt)?;
            out.push_str("Review prompt copied to clipboard.\n");
        } else {
            out.push_str(&prompt);
        }
        Ok(())
    }

    fn status(&self, out: &mut String) {
        let store = self.api.store();
        let file = store
            .source()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        out.push_str(&format!("File:      {}\n", file));
        out.push_str(&format!(
            "Questions: {} ({} modified)\n",
            store.len(),
            store.dirty_count()
        ));
        if !store.query().is_empty() {
            out.push_str(&format!(
                "Filter:    '{}' ({} shown)\n",
                store.query(),
                store.view().len()
            ));
        }
        if let Some(dr) = store.selected() {
            out.push_str(&format!("Selected:  {}\n", dr.number()));
        }
        if self.pending_draft().is_some() {
            out.push_str("Draft:     uncommitted edits\n");
        }
    }
}

fn parse_number(rest: &str) -> Result<usize> {
    rest.parse()
        .map_err(|_| QbankError::Api(format!("Expected a question number, found '{}'", rest)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbank::codec::memory::InMemoryCodec;
    use std::io::Cursor;

    const BANK: &str = "bank.csv";

    fn api() -> QbankApi<InMemoryCodec> {
        let mut codec = InMemoryCodec::new();
        codec.insert_records(
            BANK,
            &[
                RecordFields::new("Is the sky blue?", true, "Scattering.", "Ch1"),
                RecordFields::new("Is water dry?", false, "It is wet.", "Ch1"),
                RecordFields::new("2+2=4?", true, "Arithmetic.", "Ch2"),
            ],
        );
        let mut api = QbankApi::new(codec);
        api.load(Path::new(BANK)).unwrap();
        api
    }

    fn session(api: &mut QbankApi<InMemoryCodec>, script: &str) -> String {
        let options = ShellOptions {
            preview_width: 80,
            color: false,
            interactive: false,
        };
        let mut out = Vec::new();
        run(api, Cursor::new(script), &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn lists_and_filters() {
        let mut api = api();
        let out = session(&mut api, "list\nfilter IS\n");
        assert!(out.contains("  1. Is the sky blue?\n  2. Is water dry?\n  3. 2+2=4?\n"));
        assert!(out.contains("  1. Is the sky blue?\n  2. Is water dry?\n"));
        assert_eq!(api.store().view(), &[0, 1]);
    }

    #[test]
    fn draft_is_committed_when_selecting_elsewhere() {
        let mut api = api();
        let out = session(
            &mut api,
            "select 2\nset question Is water wet?\nanswer true\n3\n",
        );
        assert!(out.contains("updated in session."));

        let record = api.store().record(1).unwrap();
        assert_eq!(record.question, "Is water wet?");
        assert!(record.answer);
        assert!(record.dirty);
        assert_eq!(api.store().selection(), Some(2));
    }

    #[test]
    fn record_view_and_status_agree_on_original_index() {
        let mut api = api();
        let out = session(&mut api, "filter 2+2\nselect 1\n");
        assert!(out.contains("Original index: 3"));
        assert!(out.contains("Question 1 (original index 3)\n"));
    }

    #[test]
    fn revert_drops_pending_edits() {
        let mut api = api();
        session(&mut api, "s 1\nset chapter Ch9\nrevert\n2\n");
        assert_eq!(api.store().record(0).unwrap().chapter, "Ch1");
        assert!(!api.has_unsaved_changes());
    }

    #[test]
    fn show_includes_uncommitted_edits() {
        let mut api = api();
        let out = session(&mut api, "s 1\nset chapter Optics\nshow\nquit!\n");
        assert!(out.contains("Chapter:     Optics\n"));
        assert!(out.contains("uncommitted edits"));
    }

    #[test]
    fn quit_refuses_unsaved_changes() {
        let mut api = api();
        let out = session(&mut api, "s 1\nset question Changed?\nquit\n");
        assert!(out.contains("There are unsaved changes."));
    }

    #[test]
    fn save_commits_draft_first() {
        let mut api = api();
        let out = session(&mut api, "s 3\nset explanation Basic maths.\nsave\nquit\n");
        assert!(out.contains("Saved 3 questions (1 modified) to bank.csv"));
        assert!(!api.has_unsaved_changes());
        assert_eq!(api.store().codec().save_count(), 1);
        assert_eq!(api.store().snapshot()[2].explanation, "Basic maths.");
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut api = api();
        let out = session(&mut api, "s 1\ndelete\nn\n");
        assert!(out.contains("Delete 'Is the sky blue?'? [y/N] "));
        assert!(out.contains("Delete cancelled."));
        assert_eq!(api.store().len(), 3);

        let out = session(&mut api, "delete\ny\n");
        assert!(out.contains("Question deleted. 2 questions remaining."));
        assert_eq!(api.store().len(), 2);
    }

    #[test]
    fn add_hidden_by_filter_warns() {
        let mut api = api();
        let out = session(&mut api, "filter sky\nadd\n");
        assert!(out.contains("Not visible with current filter."));
        assert_eq!(api.store().len(), 4);
        assert_eq!(api.store().selection(), None);
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let mut api = api();
        let out = session(&mut api, "set question Orphan\nselect 9\nbogus\nstatus\n");
        assert!(out.contains("Error: "));
        assert!(out.contains("Unknown command 'bogus'"));
        assert!(out.contains("Questions: 3 (0 modified)"));
    }

    #[test]
    fn load_guards_unsaved_changes() {
        let mut api = api();
        let out = session(&mut api, "s 1\nset question X?\ncommit\nload bank.csv\n");
        assert!(out.contains("`load!` to discard them"));
        assert!(api.has_unsaved_changes());

        session(&mut api, "load! bank.csv\n");
        assert!(!api.has_unsaved_changes());
        assert_eq!(api.store().record(0).unwrap().question, "Is the sky blue?");
    }

    #[test]
    fn prompt_prints_review_text() {
        let mut api = api();
        let out = session(&mut api, "s 3\nprompt\n");
        assert!(out.contains("chapter/topic \"Ch2\""));
        assert!(out.contains("--- Question ---\n2+2=4?\n"));
    }
}
