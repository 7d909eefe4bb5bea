//! # knit
//!
//! Bundles CommonJS modules into a single file of named AMD registrations.
//!
//! Starting from one or more entry files, knit follows every `require`,
//! resolves specifiers the way Node does (including nested `node_modules`),
//! and writes each physical file exactly once, dependencies first:
//!
//! ```text
//! entries ─► GraphBuilder ─► [ModuleUnit] ─► Wrapper ─► [WrappedUnit] ─► emit ─► text
//!               │    │                          │                                 │
//!          extract  Resolver               package.json                        minify
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use knit::{BundleOptions, Bundler, NativeRuntime};
//!
//! # fn main() -> knit::Result<()> {
//! let options = BundleOptions::new(["src/main.js"], "dist/bundle.js", "/project")
//!     .ignore_modules(["react"])
//!     .compress_target("dist/bundle.min.js")
//!     .entry_code("require('src/main');");
//!
//! let bundler = Bundler::new(Arc::new(NativeRuntime::new()));
//! let (output, written) = bundler.run(&options)?;
//! println!("{} modules -> {:?}", output.modules.len(), written);
//! # Ok(())
//! # }
//! ```
//!
//! The output for a two-file project where `a.js` requires `./b` is:
//!
//! ```text
//! define('b', function (require, exports, module) {<b.js>
//! });
//!
//! define('a', function (require, exports, module) {<a.js>
//! });
//! <entry code>
//! ```

pub mod bundle;
pub mod emit;
pub mod error;
pub mod extract;
pub mod graph;
pub mod minify;
pub mod module_id;
pub mod package_json;
pub mod resolve;
pub mod runtime;
pub mod wrap;

pub use bundle::{BundleOptions, BundleOutput, BundledModule, Bundler};
pub use error::{BundleError, Result};
pub use extract::{DependencyInfo, ExtractError};
pub use graph::{AliasMap, Diagnostic, GraphBuilder, ModuleGraph, ModuleUnit};
pub use minify::MinifyLevel;
pub use resolve::{ResolveError, Resolved, Resolver};
pub use runtime::{MemoryRuntime, NativeRuntime, Runtime, RuntimeError};
pub use wrap::{WrappedUnit, Wrapper};
