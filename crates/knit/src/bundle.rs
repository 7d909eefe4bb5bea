//! Bundle orchestration.
//!
//! [`Bundler::bundle`] runs the whole pipeline in memory: graph building,
//! wrapping, emission and optional minification. [`Bundler::write`] persists
//! a finished [`BundleOutput`]. Nothing is written unless bundling succeeded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::emit::emit;
use crate::error::{BundleError, Result};
use crate::graph::{Diagnostic, GraphBuilder};
use crate::minify::{MinifyLevel, minify};
use crate::resolve::Resolver;
use crate::runtime::Runtime;
use crate::wrap::{WrappedUnit, Wrapper};

/// Configuration for one bundling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Entry files, bundled in this order. Relative paths resolve against `root`.
    pub entries: Vec<PathBuf>,

    /// Top-level package names whose edges are dropped.
    pub ignore_modules: Vec<String>,

    /// Output path for the combined text.
    pub target: PathBuf,

    /// Output path for the minified variant, if one is wanted.
    pub compress_target: Option<PathBuf>,

    /// Minification level for `compress_target` (default: identifiers).
    pub minify: Option<MinifyLevel>,

    /// Snippet appended after every module, typically a `require` of the entry.
    pub entry_code: Option<String>,

    /// Working directory. Ends the upward `node_modules` search and anchors
    /// the ids of project files.
    pub root: PathBuf,

    /// Fail on bare specifiers that cannot be found (default: false).
    pub strict_bare: bool,

    /// Collect require calls outside registration calls (default: true).
    pub include_free_require: bool,
}

impl BundleOptions {
    /// Create options for `entries` written to `target`, rooted at `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use knit::BundleOptions;
    ///
    /// let options = BundleOptions::new(["src/main.js"], "dist/bundle.js", "/project")
    ///     .ignore_modules(["react"])
    ///     .entry_code("require('src/main');");
    /// assert!(options.validate().is_ok());
    /// ```
    pub fn new<P, I>(entries: I, target: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = P>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            ignore_modules: Vec::new(),
            target: target.into(),
            compress_target: None,
            minify: None,
            entry_code: None,
            root: root.into(),
            strict_bare: false,
            include_free_require: true,
        }
    }

    pub fn ignore_modules<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_modules = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn compress_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.compress_target = Some(path.into());
        self
    }

    pub fn minify(mut self, level: MinifyLevel) -> Self {
        self.minify = Some(level);
        self
    }

    pub fn entry_code(mut self, code: impl Into<String>) -> Self {
        self.entry_code = Some(code.into());
        self
    }

    pub fn strict_bare(mut self, enabled: bool) -> Self {
        self.strict_bare = enabled;
        self
    }

    pub fn include_free_require(mut self, enabled: bool) -> Self {
        self.include_free_require = enabled;
        self
    }

    /// Validate the options.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no entries, the target is empty, or the
    /// minified output would overwrite the plain one.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(BundleError::InvalidOptions(
                "At least one entry point is required".into(),
            ));
        }

        if self.target.as_os_str().is_empty() {
            return Err(BundleError::InvalidOptions(
                "Output target must not be empty".into(),
            ));
        }

        if let Some(compress_target) = &self.compress_target {
            if self.resolve_output(compress_target) == self.resolve_output(&self.target) {
                return Err(BundleError::InvalidOptions(format!(
                    "compress_target and target are both '{}'",
                    self.target.display()
                )));
            }
        }

        Ok(())
    }

    /// Output path anchored at `root` when relative.
    pub fn resolve_output(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Level used for the minified output. `None` when no minified output is
    /// produced.
    pub fn effective_minify(&self) -> Option<MinifyLevel> {
        self.compress_target.as_ref()?;
        let level = self.minify.unwrap_or_default();
        level.is_enabled().then_some(level)
    }
}

/// A module as it appears in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledModule {
    pub file_path: String,
    pub id: String,
    pub proxies: Vec<String>,
    pub self_registering: bool,
}

impl From<&WrappedUnit> for BundledModule {
    fn from(unit: &WrappedUnit) -> Self {
        Self {
            file_path: unit.file_path.clone(),
            id: unit.canonical_id.clone(),
            proxies: unit.proxies.clone(),
            self_registering: unit.owns_define_call,
        }
    }
}

/// Result of a successful bundling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    /// Combined text: every unit in dependency order, then the trailer.
    pub code: String,
    /// Minified variant, when `compress_target` is set and minification enabled.
    pub minified: Option<String>,
    /// Modules in emission order.
    pub modules: Vec<BundledModule>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BundleOutput {
    /// Number of edges dropped because their bare specifier was not found.
    pub fn dropped_edges(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_problem()).count()
    }
}

/// Runs bundles against a [`Runtime`].
#[derive(Debug, Clone)]
pub struct Bundler {
    runtime: Arc<dyn Runtime>,
}

impl Bundler {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    /// Build the bundle in memory.
    ///
    /// # Errors
    ///
    /// Any fatal input error aborts the run; see [`BundleError`].
    pub fn bundle(&self, options: &BundleOptions) -> Result<BundleOutput> {
        options.validate()?;

        let span = tracing::debug_span!("bundle", output = %options.target.display());
        let _guard = span.enter();

        let runtime = self.runtime.as_ref();
        let resolver = Resolver::new(runtime, &options.root, options.ignore_modules.iter().cloned());
        let graph = GraphBuilder::new(runtime, resolver)
            .include_free_require(options.include_free_require)
            .strict_bare(options.strict_bare)
            .build(&options.entries)?;

        let wrapper = Wrapper::new(runtime);
        let units: Vec<WrappedUnit> = graph
            .modules
            .iter()
            .map(|unit| wrapper.wrap(unit, &graph.aliases))
            .collect();

        check_unique_ids(&units)?;

        let code = emit(&units, options.entry_code.as_deref().unwrap_or_default());
        let minified = options
            .effective_minify()
            .map(|level| minify(&code, level))
            .transpose()?;

        tracing::debug!(
            "bundled {} modules ({} dropped edges)",
            units.len(),
            graph.dropped_edges()
        );

        Ok(BundleOutput {
            code,
            minified,
            modules: units.iter().map(BundledModule::from).collect(),
            diagnostics: graph.diagnostics,
        })
    }

    /// Write `output` to the configured targets. The minified file is written
    /// first. Returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::Write` if a directory or file cannot be written.
    pub fn write(&self, options: &BundleOptions, output: &BundleOutput) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if let (Some(compress_target), Some(minified)) = (&options.compress_target, &output.minified)
        {
            let path = options.resolve_output(compress_target);
            self.write_file(&path, minified)?;
            written.push(path);
        }

        let path = options.resolve_output(&options.target);
        self.write_file(&path, &output.code)?;
        written.push(path);

        Ok(written)
    }

    /// Bundle and, on success, write the outputs.
    pub fn run(&self, options: &BundleOptions) -> Result<(BundleOutput, Vec<PathBuf>)> {
        let output = self.bundle(options)?;
        let written = self.write(options, &output)?;
        Ok((output, written))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.runtime.exists(parent) {
                self.runtime
                    .create_dir(parent, true)
                    .map_err(|source| BundleError::Write {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        self.runtime
            .write_file(path, content.as_bytes())
            .map_err(|source| BundleError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("wrote {} ({} bytes)", path.display(), content.len());
        Ok(())
    }
}

/// Distinct files must not register under the same id, whether as a primary
/// registration or as a proxy.
fn check_unique_ids(units: &[WrappedUnit]) -> Result<()> {
    let mut seen: FxHashMap<&str, &str> = FxHashMap::default();

    for unit in units.iter().filter(|unit| !unit.owns_define_call) {
        let ids = std::iter::once(&unit.canonical_id).chain(&unit.proxies);
        for id in ids {
            match seen.insert(id.as_str(), unit.file_path.as_str()) {
                Some(first) if first != unit.file_path.as_str() => {
                    return Err(BundleError::DuplicateModuleId {
                        id: id.clone(),
                        first: first.to_string(),
                        second: unit.file_path.clone(),
                    });
                }
                _ => {}
            }
        }
    }

    Ok(())
}
