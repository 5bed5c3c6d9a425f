use crate::codec::Codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{QbankError, Result};
use crate::model::{answer_literal, Record};
use crate::store::RecordStore;

/// Builds a review prompt for the selected record, suitable for pasting
/// into a chat assistant.
pub fn run<C: Codec>(store: &RecordStore<C>) -> Result<CmdResult> {
    let selected = store.selected().ok_or(QbankError::NoSelection)?;
    let mut result = CmdResult::default();

    if selected.record.question.is_empty() && selected.record.explanation.is_empty() {
        result.add_message(CmdMessage::warning(
            "The question and explanation fields are empty.",
        ));
    }

    let prompt = review_prompt(&selected.record);
    Ok(result.with_prompt(prompt).with_selected(Some(selected)))
}

pub fn review_prompt(record: &Record) -> String {
    let chapter = if record.chapter.is_empty() {
        "Not Specified"
    } else {
        record.chapter.as_str()
    };

    format!(
        "Please review the following question bank item for accuracy, clarity, and correctness.

Context: This is a True/False question related to chapter/topic \"{chapter}\".

--- Question ---
{question}

--- Provided Answer ---
{answer}

--- Provided Explanation ---
{explanation}

---
Please provide feedback on:
1.  The clarity and accuracy of the **Question**. Is it well-phrased and unambiguous?
2.  The correctness of the **Provided Answer**. Is it definitively True or False based on the question?
3.  The accuracy, clarity, and helpfulness of the **Provided Explanation**. Does it correctly justify the answer? Is it easy to understand?

Suggest corrections or improvements if necessary.
",
        chapter = chapter,
        question = record.question,
        answer = answer_literal(record.answer),
        explanation = record.explanation,
    )
}
