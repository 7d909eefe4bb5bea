//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};

use knit_config::{ConfigDiscovery, KnitConfig};

use crate::error::{CliError, Result};

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// The project root: `--cwd` if given, anchored at the process directory.
pub fn project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().map_err(CliError::Cwd)?;
    Ok(match cwd {
        Some(dir) => resolve_path(dir, &current),
        None => current,
    })
}

/// Load the explicit config file, or discover one under `root`.
pub fn load_config(root: &Path, config: Option<&Path>) -> Result<KnitConfig> {
    let discovery = ConfigDiscovery::new(root);
    let config = match config {
        Some(path) => discovery.load_from(path)?,
        None => discovery.load()?,
    };
    Ok(config)
}
