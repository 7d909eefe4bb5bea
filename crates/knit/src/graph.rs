//! Dependency graph construction.
//!
//! The builder walks from the entries depth-first and emits each module once
//! all of its dependencies have been emitted. Modules are keyed by their
//! normalized absolute path, so a file reached under several specifiers is
//! read and extracted exactly once; the specifiers it was reached under are
//! collected in the [`AliasMap`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{BundleError, Result};
use crate::extract::extract_source;
use crate::module_id::{
    BUILTIN_MODULES, logical_id, normalize_path, package_relative_id, strip_js_extension,
};
use crate::resolve::{Resolved, Resolver, resolve_file_or_directory};
use crate::runtime::Runtime;

static LEADING_DEFINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*define\s*\(").ok());

/// True if the raw text starts with a registration call.
pub fn starts_with_define(text: &str) -> bool {
    LEADING_DEFINE
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// One physical source file in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleUnit {
    /// Absolute path with forward slashes. Unique per graph.
    pub file_path: String,
    /// Path after the last `node_modules/`, or relative to the root.
    pub package_id: String,
    pub raw_text: String,
    pub sync_deps: Vec<String>,
    pub async_deps: Vec<String>,
    /// Module already registers itself and is emitted verbatim.
    pub owns_define_call: bool,
}

/// Logical identifiers each file was required under, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    inner: IndexMap<String, IndexSet<String>>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` for `file_path`. Returns false if it was already known.
    pub fn record(&mut self, file_path: &str, id: impl Into<String>) -> bool {
        self.inner
            .entry(file_path.to_string())
            .or_default()
            .insert(id.into())
    }

    pub fn ids(&self, file_path: &str) -> Option<&IndexSet<String>> {
        self.inner.get(file_path)
    }

    /// Identifiers for `file_path`, shortest first. Ties keep first-seen order.
    pub fn sorted_ids(&self, file_path: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .ids(file_path)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort_by_key(|id| id.len());
        ids
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Non-fatal events recorded while building the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Bare specifier not found in any enclosing `node_modules`. Edge dropped.
    UnresolvedBare { specifier: String, from: String },
    /// Specifier matched the ignore set. Edge dropped.
    Ignored { specifier: String, from: String },
}

impl Diagnostic {
    /// True for diagnostics that indicate a possibly incomplete bundle.
    pub fn is_problem(&self) -> bool {
        matches!(self, Diagnostic::UnresolvedBare { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedBare { specifier, from } => {
                write!(f, "unresolved '{specifier}' required from {from}")
            }
            Diagnostic::Ignored { specifier, from } => {
                write!(f, "ignored '{specifier}' required from {from}")
            }
        }
    }
}

/// Modules in dependency order plus what was learned on the way.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    pub modules: Vec<ModuleUnit>,
    pub aliases: AliasMap,
    pub diagnostics: Vec<Diagnostic>,
}

impl ModuleGraph {
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, file_path: &str) -> Option<&ModuleUnit> {
        self.modules.iter().find(|unit| unit.file_path == file_path)
    }

    /// Number of dependency edges dropped because they could not be resolved.
    pub fn dropped_edges(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_problem()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Visiting,
    Visited,
}

struct Frame {
    unit: ModuleUnit,
    children: Vec<String>,
    next: usize,
}

#[derive(Default)]
struct BuildState {
    colors: FxHashMap<String, Color>,
    graph: ModuleGraph,
}

/// Builds a [`ModuleGraph`] for one bundling run.
pub struct GraphBuilder<'r> {
    runtime: &'r dyn Runtime,
    resolver: Resolver<'r>,
    include_free_require: bool,
    strict_bare: bool,
}

impl<'r> GraphBuilder<'r> {
    pub fn new(runtime: &'r dyn Runtime, resolver: Resolver<'r>) -> Self {
        Self {
            runtime,
            resolver,
            include_free_require: true,
            strict_bare: false,
        }
    }

    /// Scan for require calls outside registration calls (default: on).
    pub fn include_free_require(mut self, enabled: bool) -> Self {
        self.include_free_require = enabled;
        self
    }

    /// Treat unresolved bare specifiers as fatal (default: off).
    pub fn strict_bare(mut self, enabled: bool) -> Self {
        self.strict_bare = enabled;
        self
    }

    /// Traverse from `entries`, in order, and return the modules with every
    /// dependency placed before its dependents.
    ///
    /// # Errors
    ///
    /// Stops at the first unreadable file, parse failure, malformed
    /// registration call, missing relative dependency or underivable id.
    pub fn build<P: AsRef<Path>>(&self, entries: &[P]) -> Result<ModuleGraph> {
        let mut state = BuildState::default();

        for entry in entries {
            let entry_path = self.entry_path(entry.as_ref());
            if state.colors.contains_key(&entry_path) {
                continue;
            }

            let mut stack = vec![self.enter(entry_path, &mut state)?];

            while let Some(frame) = stack.last_mut() {
                if let Some(child) = frame.children.get(frame.next).cloned() {
                    frame.next += 1;
                    match state.colors.get(&child).copied() {
                        None => {
                            let next = self.enter(child, &mut state)?;
                            stack.push(next);
                        }
                        Some(Color::Visiting) => {
                            tracing::debug!(
                                "cycle: {} -> {} (already on the stack)",
                                frame.unit.file_path,
                                child
                            );
                        }
                        Some(Color::Visited) => {}
                    }
                    continue;
                }

                if let Some(done) = stack.pop() {
                    state
                        .colors
                        .insert(done.unit.file_path.clone(), Color::Visited);
                    state.graph.modules.push(done.unit);
                }
            }
        }

        Ok(state.graph)
    }

    fn entry_path(&self, entry: &Path) -> String {
        let candidate = self.resolver.root().join(entry);
        let resolved =
            resolve_file_or_directory(self.runtime, &candidate).unwrap_or(candidate);
        normalize_path(&resolved)
    }

    /// Read, extract and resolve one module, marking it as visiting.
    fn enter(&self, file_path: String, state: &mut BuildState) -> Result<Frame> {
        state.colors.insert(file_path.clone(), Color::Visiting);

        let path = PathBuf::from(&file_path);
        let raw_text = self
            .runtime
            .read_to_string(&path)
            .map_err(|source| BundleError::Read {
                path: path.clone(),
                source,
            })?;

        let root = normalize_path(self.resolver.root());
        let package_id = package_relative_id(&file_path, &root)?;

        let info = extract_source(&path, &raw_text, self.include_free_require).map_err(
            |source| BundleError::Extract {
                path: file_path.clone(),
                source,
            },
        )?;

        tracing::debug!(
            "visiting {} ({} sync, {} async deps)",
            package_id,
            info.sync_deps.len(),
            info.async_deps.len()
        );

        let mut children = Vec::new();
        for specifier in info.sync_deps.iter().chain(&info.async_deps) {
            if BUILTIN_MODULES.contains(&specifier.as_str()) {
                continue;
            }

            match self.resolver.resolve(specifier, &path)? {
                Resolved::File(target) => {
                    let target = normalize_path(&target);
                    let alias = if specifier.starts_with('/') {
                        strip_js_extension(&package_relative_id(&target, &root)?).to_string()
                    } else {
                        logical_id(specifier, &package_id)
                    };
                    tracing::debug!("resolved '{}' -> {}", specifier, target);
                    state.graph.aliases.record(&target, alias);
                    children.push(target);
                }
                Resolved::Ignored => {
                    tracing::debug!("ignoring '{}' from {}", specifier, package_id);
                    state.graph.diagnostics.push(Diagnostic::Ignored {
                        specifier: specifier.clone(),
                        from: file_path.clone(),
                    });
                }
                Resolved::Unresolved => {
                    if self.strict_bare {
                        return Err(BundleError::UnresolvedBare {
                            specifier: specifier.clone(),
                            from: file_path,
                        });
                    }
                    tracing::warn!(
                        "cannot find '{}' required from {}, dropping it",
                        specifier,
                        file_path
                    );
                    state.graph.diagnostics.push(Diagnostic::UnresolvedBare {
                        specifier: specifier.clone(),
                        from: file_path.clone(),
                    });
                }
            }
        }

        let owns_define_call = info.has_own_registration || starts_with_define(&raw_text);

        Ok(Frame {
            unit: ModuleUnit {
                file_path,
                package_id,
                raw_text,
                sync_deps: info.sync_deps,
                async_deps: info.async_deps,
                owns_define_call,
            },
            children,
            next: 0,
        })
    }
}
