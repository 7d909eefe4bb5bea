//! Upward search through nested `node_modules` directories.

use std::path::{Path, PathBuf};

use crate::module_id::MODULE_DIR;
use crate::runtime::Runtime;

use super::extensions::resolve_file_or_directory;

/// Look for `specifier` in `<cursor>/node_modules`, starting at `from_dir` and
/// moving to the parent each time nothing is found.
///
/// The walk ends once `root` has been searched, or at the filesystem root if
/// `from_dir` is not below `root`.
pub fn find_in_node_modules(
    runtime: &dyn Runtime,
    specifier: &str,
    from_dir: &Path,
    root: &Path,
) -> Option<PathBuf> {
    let mut cursor = Some(from_dir);

    while let Some(dir) = cursor {
        // `node_modules/node_modules` is never a package location
        let is_module_dir = dir.file_name().is_some_and(|name| name == MODULE_DIR);

        if !is_module_dir {
            let modules = dir.join(MODULE_DIR);
            if runtime.is_dir(&modules) {
                if let Some(found) = resolve_file_or_directory(runtime, &modules.join(specifier))
                {
                    tracing::trace!("'{}' found under {}", specifier, modules.display());
                    return Some(found);
                }
            }
        }

        if dir == root {
            break;
        }
        cursor = dir.parent();
    }

    None
}
