//! knit CLI - bundle CommonJS modules into named AMD registrations.
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `build`, `bundle` and `check`
//! - [`error`] - [`CliError`] and its miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages and bundle summaries

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
