use std::path::PathBuf;

use thiserror::Error;

use crate::extract::ExtractError;
use crate::module_id::ModuleIdError;
use crate::resolve::ResolveError;
use crate::runtime::RuntimeError;

/// Result type for bundling operations.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Fatal bundling errors. Any of these aborts the run before output is written.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Failed to read module '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("Invalid module '{path}': {source}")]
    Extract {
        path: String,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    IllegalModulePath(#[from] ModuleIdError),

    #[error("Cannot find package '{specifier}' required from '{from}'")]
    UnresolvedBare { specifier: String, from: String },

    /// Also raised when two nested copies of one package (different versions
    /// under different `node_modules`) are both reached, since both register
    /// under the same package-relative id.
    #[error(
        "Module id '{id}' is claimed by both '{first}' and '{second}' \
         (nested copies of one package register under the same id)"
    )]
    DuplicateModuleId {
        id: String,
        first: String,
        second: String,
    },

    #[error("Minification failed: {0}")]
    Minify(String),

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("Invalid bundle options: {0}")]
    InvalidOptions(String),
}
