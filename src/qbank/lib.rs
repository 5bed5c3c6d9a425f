//! # Qbank Architecture
//!
//! Qbank edits true/false question banks: rows of question, answer,
//! explanation and chapter kept in a CSV file. The library holds the whole
//! editing session; the bundled CLI is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - One-shot subcommands and the interactive shell           │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, returns CmdResult             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per user action, adds status messages         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record Store (store.rs)                                    │
//! │  - Records, filter view, selection, dirty flags, snapshot   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Codec Layer (codec/)                                       │
//! │  - Codec trait; CsvCodec (production), InMemoryCodec (tests)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns
//! `Result<CmdResult>`. It never prints, never exits, and never asks the
//! user anything. Confirmation before destructive actions and committing
//! pending form edits before navigating are the caller's responsibility.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`commands`]: per-action logic and status messages
//! - [`store`]: the editing state machine
//! - [`view`]: filter predicate and visible/master index mapping
//! - [`codec`]: persistence format
//! - [`model`]: `Record` and `RecordFields`
//! - [`config`]: configuration management
//! - [`editor`]: external editor integration
//! - [`clipboard`]: cross-platform clipboard support
//! - [`error`]: error types

pub mod api;
pub mod clipboard;
pub mod codec;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod store;
pub mod view;
