//! Package.json metadata lookup.
//!
//! Only the fields the resolver and wrapper need are parsed: the package
//! `name` and its declared `main` entry.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::module_id::MODULE_DIR;
use crate::runtime::Runtime;

/// Maximum allowed size for package.json files (10MB)
const MAX_PACKAGE_JSON_SIZE: u64 = 10 * 1024 * 1024;

/// Parsed package.json structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageJson {
    /// Package name
    pub name: Option<String>,
    /// Declared main entry, relative to the package directory
    pub main: Option<String>,
    /// File path this was loaded from
    #[serde(skip)]
    pub path: PathBuf,
}

impl PackageJson {
    /// Load `package.json` from `dir`, if present and well-formed.
    ///
    /// Missing, oversized or malformed files are treated as "no metadata";
    /// resolution then falls back to `index.*` lookup.
    pub fn load(runtime: &dyn Runtime, dir: &Path) -> Option<Self> {
        let path = dir.join("package.json");
        let metadata = runtime.metadata(&path).ok()?;
        if !metadata.is_file || metadata.size > MAX_PACKAGE_JSON_SIZE {
            return None;
        }

        let content = runtime.read_to_string(&path).ok()?;
        match serde_json::from_str::<PackageJson>(&content) {
            Ok(mut pkg) => {
                pkg.path = path;
                Some(pkg)
            }
            Err(err) => {
                tracing::debug!("ignoring malformed {}: {}", path.display(), err);
                None
            }
        }
    }

    /// The non-empty `main` field, if declared.
    pub fn main(&self) -> Option<&str> {
        self.main.as_deref().filter(|main| !main.trim().is_empty())
    }

    /// Cleaned `main` path when it points below the package root.
    ///
    /// `lib/index.js` is deeper; `index.js` and `./index.js` are not.
    pub fn deeper_main(&self) -> Option<String> {
        let cleaned = Path::new(self.main()?).clean();
        let cleaned = cleaned.to_string_lossy().replace('\\', "/");
        (cleaned.split('/').count() > 1 && !cleaned.starts_with("..")).then_some(cleaned)
    }
}

/// Directory of the installed package that contains `file_path`.
///
/// For `/app/node_modules/@scope/pkg/lib/x.js` this is
/// `/app/node_modules/@scope/pkg`. Paths outside `node_modules` have none.
pub fn package_dir_of(file_path: &str) -> Option<PathBuf> {
    let needle = format!("/{MODULE_DIR}/");
    let index = file_path.rfind(&needle)?;
    let (prefix, rest) = file_path.split_at(index + needle.len());
    let name = extract_package_name(rest);
    if name.is_empty() || name == rest {
        return None;
    }
    Some(PathBuf::from(format!("{prefix}{name}")))
}

/// Extract the package name from an import specifier.
///
/// `lodash/fp` becomes `lodash`, `@org/pkg/sub` becomes `@org/pkg`.
pub fn extract_package_name(specifier: &str) -> &str {
    if specifier.is_empty() {
        return specifier;
    }

    // Handle scoped packages (@org/package)
    if specifier.starts_with('@') {
        if let Some(first_slash) = specifier.find('/') {
            if let Some(second_slash) = specifier[first_slash + 1..].find('/') {
                return &specifier[..first_slash + 1 + second_slash];
            }
        }
        return specifier;
    }

    if let Some(slash_idx) = specifier.find('/') {
        &specifier[..slash_idx]
    } else {
        specifier
    }
}
