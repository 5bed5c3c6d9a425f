use clap::{Args, Parser, Subcommand};
use qbank::codec::parse_answer;
use qbank::editor::edit_fields;
use qbank::error::Result;
use qbank::model::RecordFields;
use std::path::PathBuf;

/// Returns the version string, including the git hash for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("QBANK_GIT_HASH");
    const IS_RELEASE: &str = env!("QBANK_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "qbank", bin_name = "qbank", version = get_version())]
#[command(about = "Edit true/false question banks stored as CSV", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Question bank CSV file (defaults to the configured default-file)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

fn parse_answer_arg(s: &str) -> std::result::Result<bool, String> {
    parse_answer(s).ok_or_else(|| format!("expected True or False, found '{}'", s))
}

/// Field values given on the command line; unset fields keep their value.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Question text
    #[arg(long)]
    pub question: Option<String>,

    /// Answer (True or False)
    #[arg(long, value_parser = parse_answer_arg)]
    pub answer: Option<bool>,

    /// Explanation text
    #[arg(long)]
    pub explanation: Option<String>,

    /// Chapter or topic
    #[arg(long)]
    pub chapter: Option<String>,

    /// Open the fields in $EDITOR (after applying any flags)
    #[arg(long)]
    pub editor: bool,
}

impl FieldArgs {
    pub fn apply(&self, base: RecordFields) -> RecordFields {
        RecordFields {
            question: self.question.clone().unwrap_or(base.question),
            answer: self.answer.unwrap_or(base.answer),
            explanation: self.explanation.clone().unwrap_or(base.explanation),
            chapter: self.chapter.clone().unwrap_or(base.chapter),
        }
    }

    /// Applies the flags, then hands the result to the editor if asked.
    pub fn resolve(&self, base: RecordFields) -> Result<RecordFields> {
        let fields = self.apply(base);
        if self.editor {
            edit_fields(&fields)
        } else {
            Ok(fields)
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List questions
    #[command(alias = "ls")]
    List {
        /// Only questions containing this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one question in full
    #[command(alias = "v")]
    Show {
        /// Number in the (filtered) list
        number: usize,

        /// Number refers to the list filtered by this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a question and save the file
    #[command(alias = "n")]
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit a question and save the file
    #[command(alias = "e")]
    Edit {
        /// Number in the (filtered) list
        number: usize,

        /// Number refers to the list filtered by this text
        #[arg(short, long)]
        search: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a question and save the file
    #[command(alias = "rm")]
    Delete {
        /// Number in the (filtered) list
        number: usize,

        /// Number refers to the list filtered by this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Copy a review prompt for a question to the clipboard
    Prompt {
        /// Number in the (filtered) list
        number: usize,

        /// Number refers to the list filtered by this text
        #[arg(short, long)]
        search: Option<String>,

        /// Print the prompt instead of copying it
        #[arg(long)]
        print: bool,
    },

    /// Interactive editing session
    Shell,

    /// Get or set configuration
    Config {
        /// Configuration key (default-file, answer-policy, preview-width)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
