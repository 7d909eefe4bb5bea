//! Node-style file inference.
//!
//! A candidate path resolves, in order, to the path itself, the path with an
//! extension appended, or a directory's `main`/`index` file.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::package_json::PackageJson;
use crate::runtime::Runtime;

/// Extensions tried after the bare candidate, appended rather than substituted.
pub const EXTENSIONS: [&str; 3] = [".js", ".json", ".node"];

/// Resolve `candidate` to a file, following the Node lookup order.
pub fn resolve_file_or_directory(runtime: &dyn Runtime, candidate: &Path) -> Option<PathBuf> {
    let candidate = candidate.clean();
    if let Some(file) = resolve_as_file(runtime, &candidate) {
        return Some(file);
    }
    if runtime.is_dir(&candidate) {
        return resolve_as_directory(runtime, &candidate);
    }
    None
}

fn resolve_as_file(runtime: &dyn Runtime, candidate: &Path) -> Option<PathBuf> {
    if runtime.is_file(candidate) {
        return Some(candidate.to_path_buf());
    }

    EXTENSIONS
        .iter()
        .map(|ext| append_extension(candidate, ext))
        .find(|path| runtime.is_file(path))
}

fn resolve_as_directory(runtime: &dyn Runtime, dir: &Path) -> Option<PathBuf> {
    if let Some(pkg) = PackageJson::load(runtime, dir) {
        if let Some(main) = pkg.main() {
            let main_path = dir.join(main).clean();
            if let Some(file) = resolve_as_file(runtime, &main_path) {
                return Some(file);
            }
            if let Some(index) = resolve_index(runtime, &main_path) {
                return Some(index);
            }
            tracing::debug!(
                "main '{}' of {} does not exist, falling back to index",
                main,
                pkg.path.display()
            );
        }
    }

    resolve_index(runtime, dir)
}

fn resolve_index(runtime: &dyn Runtime, dir: &Path) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("index{ext}")))
        .find(|path| runtime.is_file(path))
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(ext);
    PathBuf::from(os)
}
