//! Error handling for the knit CLI.
//!
//! Commands return [`CliError`]; `main` turns it into a [`miette::Report`]
//! with a hint attached where one is known.

use std::path::PathBuf;

use knit::{BundleError, ResolveError};
use knit_config::ConfigError;
use miette::Report;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    #[error("No bundle writes to '{}'", .0.display())]
    UnknownTarget(PathBuf),

    #[error("Cannot determine working directory: {0}")]
    Cwd(#[source] std::io::Error),
}

impl CliError {
    /// Suggested fix shown under the error.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Config(ConfigError::NotFound) => {
                Some("Create knit.toml in the project root or pass --config <path>")
            }
            CliError::Config(ConfigError::EntryNotFound { .. }) => {
                Some("Entry paths are relative to the project root; see --cwd")
            }
            CliError::Config(ConfigError::NoBundles) => {
                Some("Add a [[bundles]] table with entries and a target")
            }
            CliError::Bundle(BundleError::Resolve(ResolveError::RelativeNotFound { .. })) => {
                Some("Relative requires must point at an existing file or directory")
            }
            CliError::Bundle(BundleError::UnresolvedBare { .. }) => {
                Some("Install the package or list it in ignore_modules")
            }
            CliError::Bundle(BundleError::DuplicateModuleId { .. }) => {
                Some("Two files map to the same module id; rename one, or dedupe nested copies of a package")
            }
            CliError::Bundle(BundleError::Extract { .. }) => {
                Some("define() needs a factory function as its last argument")
            }
            CliError::UnknownTarget(_) => Some("Run `knit check` to list the configured targets"),
            _ => None,
        }
    }
}

/// Convert a CLI error to a miette report.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err.hint() {
        Some(hint) => miette::miette!(help = hint, "{err}"),
        None => miette::miette!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_has_hint() {
        let err = CliError::from(ConfigError::NotFound);
        assert!(err.hint().unwrap().contains("knit.toml"));
    }

    #[test]
    fn bundle_errors_are_wrapped() {
        let err = CliError::from(BundleError::UnresolvedBare {
            specifier: "left-pad".into(),
            from: "a.js".into(),
        });
        assert!(err.to_string().contains("left-pad"));
        assert!(err.hint().is_some());
    }

    #[test]
    fn report_keeps_message() {
        let report = cli_error_to_miette(CliError::UnknownTarget(PathBuf::from("out.js")));
        assert!(report.to_string().contains("out.js"));
        assert!(report.help().is_some());
    }
}
