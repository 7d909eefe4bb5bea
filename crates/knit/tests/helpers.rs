//! Shared test utilities for knit integration tests

#![allow(dead_code)]
#![allow(clippy::disallowed_methods)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use knit::{BundleOptions, Bundler, NativeRuntime};
use tempfile::TempDir;

/// A throwaway project directory on disk.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Root path with forward slashes, as it appears in module paths.
    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, content: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write fixture");
        self
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("read output")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.dir.path().join(relative).exists()
    }

    pub fn options<const N: usize>(&self, entries: [&str; N], target: &str) -> BundleOptions {
        BundleOptions::new(entries, target, self.root())
    }
}

pub fn bundler() -> Bundler {
    Bundler::new(Arc::new(NativeRuntime::new()))
}

/// Registration header emitted for a wrapped module.
pub fn header(id: &str) -> String {
    format!("define('{id}', function (require, exports, module) {{")
}

/// Forwarding registration emitted for an alias.
pub fn proxy(alias: &str, id: &str) -> String {
    format!("define('{alias}', function (require) {{return require('{id}');}});")
}

/// Byte offset of `needle` in `haystack`, panicking with context if absent.
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("expected to find {needle:?} in:\n{haystack}"))
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
