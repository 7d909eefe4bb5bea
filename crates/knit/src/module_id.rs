//! Module paths and logical identifiers.
//!
//! Physical modules are keyed by their absolute, forward-slash path. The ids
//! written into `define(...)` calls are *package-relative*: the part of the
//! path after the last `node_modules/`, or the path relative to the bundle
//! root for project files.

use std::path::Path;

use path_clean::PathClean;
use thiserror::Error;

use crate::package_json::extract_package_name;

/// Package installation directory name.
pub const MODULE_DIR: &str = "node_modules";

/// Source extension stripped from derived ids.
pub const MODULE_EXTNAME: &str = ".js";

/// Placeholders every AMD loader provides to a factory.
pub const BUILTIN_MODULES: [&str; 3] = ["require", "exports", "module"];

const VARIANT_SUFFIXES: [&str; 2] = [".dev", ".prod"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModuleIdError {
    #[error("illegal module path '{path}': not inside {MODULE_DIR} or under root '{root}'")]
    IllegalModulePath { path: String, root: String },
}

/// Clean `.`/`..` components and use forward slashes.
pub fn normalize_path(path: &Path) -> String {
    path.clean().to_string_lossy().replace('\\', "/")
}

/// True for specifiers that start with a relative-path marker.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with('.')
}

/// True if `id` names a package and nothing below it (`pkg`, `@scope/pkg`).
pub fn is_bare_package_name(id: &str) -> bool {
    !id.is_empty() && !is_relative(id) && extract_package_name(id) == id
}

/// Derive the package-relative id of a normalized absolute path.
///
/// # Errors
///
/// Returns `ModuleIdError::IllegalModulePath` when the file is neither inside
/// a `node_modules` directory nor under `root`.
pub fn package_relative_id(file_path: &str, root: &str) -> Result<String, ModuleIdError> {
    let needle = format!("/{MODULE_DIR}/");
    if let Some(index) = file_path.rfind(&needle) {
        return Ok(file_path[index + needle.len()..].to_string());
    }

    if let Ok(relative) = Path::new(file_path).strip_prefix(root) {
        let relative = normalize_path(relative);
        if !relative.is_empty() && relative != "." {
            return Ok(relative);
        }
    }

    Err(ModuleIdError::IllegalModulePath {
        path: file_path.to_string(),
        root: root.to_string(),
    })
}

/// Strip a trailing `.js`.
pub fn strip_js_extension(id: &str) -> &str {
    id.strip_suffix(MODULE_EXTNAME).unwrap_or(id)
}

/// Strip a trailing `.dev` or `.prod` build-variant suffix.
pub fn strip_variant_suffix(id: &str) -> &str {
    VARIANT_SUFFIXES
        .iter()
        .find_map(|suffix| id.strip_suffix(suffix))
        .unwrap_or(id)
}

/// The identifier a referencing module used to reach a dependency.
///
/// Bare specifiers are used verbatim. Relative ones are joined onto the
/// directory of the referencing module's own id.
pub fn logical_id(specifier: &str, referencing_id: &str) -> String {
    if !is_relative(specifier) {
        return specifier.to_string();
    }

    let base = Path::new(referencing_id).parent().unwrap_or(Path::new(""));
    normalize_path(&base.join(specifier))
}
