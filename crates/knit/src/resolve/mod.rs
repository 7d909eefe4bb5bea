//! Specifier resolution.
//!
//! Path specifiers (`./x`, `../x`, `/abs/x`) resolve against the referencing
//! file and fail hard when missing. Bare specifiers are checked against the
//! ignore set, then searched for through the enclosing `node_modules`
//! directories; a miss there is tolerated and reported as `Unresolved`.

mod extensions;
mod node_modules;

pub use extensions::{EXTENSIONS, resolve_file_or_directory};
pub use node_modules::find_in_node_modules;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::module_id::is_relative;
use crate::package_json::extract_package_name;
use crate::runtime::Runtime;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Cannot find module '{specifier}' from '{}'", from.display())]
    RelativeNotFound { specifier: String, from: PathBuf },
}

/// Result of resolving one dependency edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Concrete file on disk.
    File(PathBuf),
    /// Bare specifier whose package is in the ignore set.
    Ignored,
    /// Bare specifier not found in any enclosing `node_modules`.
    Unresolved,
}

/// Resolves specifiers for one bundling run.
///
/// Holds no cache; each call probes the runtime afresh.
#[derive(Debug)]
pub struct Resolver<'r> {
    runtime: &'r dyn Runtime,
    root: PathBuf,
    ignore: FxHashSet<String>,
}

impl<'r> Resolver<'r> {
    pub fn new<I, S>(runtime: &'r dyn Runtime, root: impl Into<PathBuf>, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            runtime,
            root: root.into(),
            ignore: ignore.into_iter().map(Into::into).collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True if `specifier` belongs to an ignored package.
    ///
    /// Both the leading path segment and the full (possibly scoped) package
    /// name are checked, so ignoring `@scope` drops every package under it.
    pub fn is_ignored(&self, specifier: &str) -> bool {
        if self.ignore.is_empty() || is_path_specifier(specifier) {
            return false;
        }
        let first_segment = specifier.split('/').next().unwrap_or(specifier);
        self.ignore.contains(first_segment)
            || self.ignore.contains(extract_package_name(specifier))
    }

    /// Resolve `specifier` as referenced from `referencing_file`.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::RelativeNotFound` when a path specifier does not
    /// designate an existing file.
    pub fn resolve(
        &self,
        specifier: &str,
        referencing_file: &Path,
    ) -> Result<Resolved, ResolveError> {
        let from_dir = referencing_file.parent().unwrap_or(Path::new("/"));

        if is_path_specifier(specifier) {
            let candidate = if is_relative(specifier) {
                from_dir.join(specifier)
            } else {
                PathBuf::from(specifier)
            };

            return resolve_file_or_directory(self.runtime, &candidate)
                .map(Resolved::File)
                .ok_or_else(|| ResolveError::RelativeNotFound {
                    specifier: specifier.to_string(),
                    from: referencing_file.to_path_buf(),
                });
        }

        if self.is_ignored(specifier) {
            return Ok(Resolved::Ignored);
        }

        Ok(
            find_in_node_modules(self.runtime, specifier, from_dir, &self.root)
                .map_or(Resolved::Unresolved, Resolved::File),
        )
    }
}

fn is_path_specifier(specifier: &str) -> bool {
    is_relative(specifier) || specifier.starts_with('/')
}
