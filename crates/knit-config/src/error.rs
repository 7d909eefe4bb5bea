//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors (for CLI use)
    #[error("bundle #{bundle}: entry path not found: {}", path.display())]
    EntryNotFound { bundle: usize, path: PathBuf },

    #[error("bundle #{bundle}: entry_code_file not found: {}", path.display())]
    EntryCodeFileNotFound { bundle: usize, path: PathBuf },

    // Config parsing/loading errors
    #[error("config not found (looked for knit.toml and a \"knit\" field in package.json)")]
    NotFound,

    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    // Schema validation errors (no filesystem checks)
    #[error("no bundles specified")]
    NoBundles,

    #[error("bundle #{bundle}: no entries specified")]
    NoEntries { bundle: usize },

    #[error("bundle #{bundle}: {message}")]
    SchemaValidation { bundle: usize, message: String },

    #[error("failed to read '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },
}
