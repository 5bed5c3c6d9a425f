//! # CLI Layer
//!
//! This module is **one possible UI client** for qbank. It is the only place
//! that parses arguments, prints, and decides exit codes.
//!
//! One-shot commands are short sessions: load the bank, optionally filter,
//! select by 1-based number, act through `QbankApi`, and save back when the
//! command mutates. The interactive shell (see `shell.rs`) keeps one session
//! open instead.
//!
//! ## Structure
//!
//! - `run()`: parse, set up logging and context, dispatch
//! - `init_context()`: config, codec and API
//! - `handle_*()`: per-command handlers that call the API and print

use super::render::{render_list, render_messages, render_record};
use super::setup::{Cli, Commands, FieldArgs};
use super::shell;
use clap::Parser;
use qbank::api::{CmdResult, ConfigAction, MessageLevel, QbankApi};
use qbank::clipboard::copy_to_clipboard;
use qbank::codec::csv_file::CsvCodec;
use qbank::config::{self, QbankConfig, KEYS};
use qbank::error::{QbankError, Result};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::Level;

struct AppContext {
    api: QbankApi<CsvCodec>,
    config: QbankConfig,
    config_dir: PathBuf,
    file: Option<PathBuf>,
    color: bool,
}

impl AppContext {
    /// The bank named by `--file`, else the configured default.
    fn bank_path(&self) -> Result<PathBuf> {
        self.file
            .clone()
            .or_else(|| self.config.default_file.clone())
            .ok_or_else(|| {
                QbankError::Api(
                    "No question bank given. Pass --file or run `qbank config default-file <path>`"
                        .to_string(),
                )
            })
    }

    fn print(&self, result: &CmdResult) {
        print!("{}", render_messages(&result.messages, self.color));
    }

    /// Loads the bank, printing only load warnings.
    fn open_bank(&mut self) -> Result<()> {
        let path = self.bank_path()?;
        let result = self.api.load(&path)?;
        let warnings: Vec<_> = result
            .messages
            .into_iter()
            .filter(|m| m.level == MessageLevel::Warning)
            .collect();
        eprint!("{}", render_messages(&warnings, self.color));
        Ok(())
    }

    /// Loads, applies `search`, and selects `number`.
    fn open_selected(&mut self, number: usize, search: Option<&str>) -> Result<()> {
        self.open_bank()?;
        if let Some(query) = search {
            self.api.filter(query)?;
        }
        self.api.select(number)?;
        Ok(())
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { search }) => handle_list(&mut ctx, search),
        Some(Commands::Show { number, search }) => handle_show(&mut ctx, number, search),
        Some(Commands::Add { fields }) => handle_add(&mut ctx, fields),
        Some(Commands::Edit {
            number,
            search,
            fields,
        }) => handle_edit(&mut ctx, number, search, fields),
        Some(Commands::Delete { number, search }) => handle_delete(&mut ctx, number, search),
        Some(Commands::Prompt {
            number,
            search,
            print,
        }) => handle_prompt(&mut ctx, number, search, print),
        Some(Commands::Shell) => handle_shell(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&mut ctx, None),
    }
}

/// Diagnostics go to stderr so they never mix with command output.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = config::config_dir()?;
    let config = QbankConfig::load(&config_dir)?;
    let codec = CsvCodec::new().with_answer_policy(config.answer_policy);
    tracing::debug!(dir = %config_dir.display(), policy = %config.answer_policy, "loaded config");

    Ok(AppContext {
        api: QbankApi::new(codec),
        config,
        config_dir,
        file: cli.file.clone(),
        color: io::stdout().is_terminal(),
    })
}

fn handle_list(ctx: &mut AppContext, search: Option<String>) -> Result<()> {
    ctx.open_bank()?;
    let result = match search {
        Some(query) => ctx.api.filter(&query)?,
        None => ctx.api.list()?,
    };
    print!(
        "{}",
        render_list(&result.listed, None, ctx.config.preview_width, ctx.color)
    );
    Ok(())
}

fn handle_show(ctx: &mut AppContext, number: usize, search: Option<String>) -> Result<()> {
    ctx.open_selected(number, search.as_deref())?;
    if let Some(dr) = ctx.api.store().selected() {
        print!("{}", render_record(&dr, ctx.color));
    }
    Ok(())
}

fn handle_add(ctx: &mut AppContext, fields: FieldArgs) -> Result<()> {
    ctx.open_bank()?;
    let added = ctx.api.add()?;

    let base = added
        .selected
        .as_ref()
        .map(|dr| dr.record.fields())
        .unwrap_or_default();
    let values = fields.resolve(base)?;
    ctx.api.commit_edit(values)?;

    if let Some(dr) = ctx.api.store().selected() {
        print!("{}", render_record(&dr, ctx.color));
    }
    let saved = ctx.api.save(None)?;
    ctx.print(&saved);
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    number: usize,
    search: Option<String>,
    fields: FieldArgs,
) -> Result<()> {
    ctx.open_selected(number, search.as_deref())?;
    let base = ctx
        .api
        .store()
        .selected()
        .map(|dr| dr.record.fields())
        .ok_or(QbankError::NoSelection)?;

    let values = fields.resolve(base)?;
    let edited = ctx.api.commit_edit(values)?;
    ctx.print(&edited);

    if ctx.api.has_unsaved_changes() {
        let saved = ctx.api.save(None)?;
        ctx.print(&saved);
    }
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, number: usize, search: Option<String>) -> Result<()> {
    ctx.open_selected(number, search.as_deref())?;
    let deleted = ctx.api.delete_selected()?;
    let saved = ctx.api.save(None)?;
    ctx.print(&deleted);
    ctx.print(&saved);
    Ok(())
}

fn handle_prompt(
    ctx: &mut AppContext,
    number: usize,
    search: Option<String>,
    print_only: bool,
) -> Result<()> {
    ctx.open_selected(number, search.as_deref())?;
    let result = ctx.api.review_prompt()?;
    let prompt = result.prompt.clone().unwrap_or_default();
    eprint!("{}", render_messages(&result.messages, ctx.color));

    if print_only {
        print!("{}", prompt);
        return Ok(());
    }

    match copy_to_clipboard(&prompt) {
        Ok(()) => println!("Review prompt copied to clipboard."),
        Err(e) => {
            tracing::warn!("clipboard unavailable: {}", e);
            print!("{}", prompt);
        }
    }
    Ok(())
}

fn handle_shell(ctx: &mut AppContext) -> Result<()> {
    if let Ok(path) = ctx.bank_path() {
        match ctx.api.load(&path) {
            Ok(result) => ctx.print(&result),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let options = shell::ShellOptions {
        preview_width: ctx.config.preview_width,
        color: ctx.color,
        interactive: stdin.is_terminal(),
    };
    shell::run(&mut ctx.api, stdin.lock(), &mut stdout, options)
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(&ctx.config_dir, action)?;
    if let Some(error) = result
        .messages
        .iter()
        .find(|m| m.level == MessageLevel::Error)
    {
        return Err(QbankError::Config(error.content.clone()));
    }
    ctx.print(&result);

    if show_all {
        if let Some(config) = &result.config {
            for key in KEYS {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
    }
    Ok(())
}
