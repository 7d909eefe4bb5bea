//! Dependency extraction from AMD/CommonJS source.
//!
//! A module's dependencies come from two places:
//!
//! - registration calls, `define(id?, deps?, factory)`, whose declared array
//!   (or, without one, the factory's parameter count) yields sync deps;
//! - require-style expressions, `require('x')` or `new require('x')` for a
//!   sync dep and `require(['a', 'b'])` for async deps.
//!
//! Require calls are collected inside every factory body, and across the rest
//! of the file when free requires are enabled. Nested registration calls are
//! never descended into.

use std::path::Path;

use indexmap::IndexSet;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, ArrayExpression, ArrayExpressionElement, CallExpression, Expression,
    NewExpression, Program,
};
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use oxc_span::SourceType;
use thiserror::Error;

use crate::module_id::BUILTIN_MODULES;

/// Reserved callee name of a registration call.
pub const DEFINE: &str = "define";

/// Reserved callee name of a require call.
pub const REQUIRE: &str = "require";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to parse '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Registration call at offset {offset} has no factory")]
    MissingFactory { offset: u32 },
}

/// Dependencies discovered in one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyInfo {
    /// True if the module contains at least one registration call.
    pub has_own_registration: bool,
    /// Deps needed before the module body runs, first occurrence order.
    pub sync_deps: Vec<String>,
    /// Deps loaded on demand through `require([...])`.
    pub async_deps: Vec<String>,
}

#[derive(Debug, Default)]
struct DepSets {
    sync: IndexSet<String>,
    async_: IndexSet<String>,
}

impl DepSets {
    fn merge(&mut self, other: DepSets) {
        self.sync.extend(other.sync);
        self.async_.extend(other.async_);
    }
}

/// Parse `source` and extract its dependencies.
///
/// `.mjs` files parse as ES modules, `.jsx` as CommonJS with JSX, and
/// everything else as CommonJS script.
pub fn extract_source(
    path: &Path,
    source: &str,
    include_free_require: bool,
) -> Result<DependencyInfo, ExtractError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type_for(path)).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ExtractError::Parse {
            path: path.display().to_string(),
            message,
        });
    }

    extract(&ret.program, include_free_require)
}

fn source_type_for(path: &Path) -> SourceType {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("mjs") => SourceType::mjs(),
        Some("jsx") => SourceType::cjs().with_jsx(true),
        _ => SourceType::cjs(),
    }
}

/// Extract dependencies from an already parsed program.
///
/// # Errors
///
/// Returns `ExtractError::MissingFactory` for a registration call that has
/// no factory argument.
pub fn extract(
    program: &Program<'_>,
    include_free_require: bool,
) -> Result<DependencyInfo, ExtractError> {
    let mut scanner = FileScanner {
        include_free_require,
        free: DepSets::default(),
        defines: Vec::new(),
        error: None,
    };
    scanner.visit_program(program);

    if let Some(err) = scanner.error {
        return Err(err);
    }

    let has_own_registration = !scanner.defines.is_empty();
    let mut deps = scanner.free;
    for define in scanner.defines {
        deps.merge(define);
    }

    Ok(DependencyInfo {
        has_own_registration,
        sync_deps: deps.sync.into_iter().collect(),
        async_deps: deps.async_.into_iter().collect(),
    })
}

fn callee_is(callee: &Expression<'_>, name: &str) -> bool {
    matches!(callee, Expression::Identifier(ident) if ident.name.as_str() == name)
}

fn string_elements<'a>(array: &'a ArrayExpression<'a>) -> impl Iterator<Item = String> + 'a {
    array.elements.iter().filter_map(|element| match element {
        ArrayExpressionElement::StringLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    })
}

/// Record a require-style call into `deps`. Returns true if it matched.
fn collect_require(
    callee: &Expression<'_>,
    arguments: &[Argument<'_>],
    deps: &mut DepSets,
) -> bool {
    if !callee_is(callee, REQUIRE) {
        return false;
    }

    match arguments.first() {
        Some(Argument::StringLiteral(lit)) => {
            deps.sync.insert(lit.value.to_string());
            true
        }
        Some(Argument::ArrayExpression(array)) => {
            deps.async_.extend(string_elements(array));
            true
        }
        _ => false,
    }
}

/// Analyze one `define(...)` call.
fn analyze_define(call: &CallExpression<'_>) -> Result<DepSets, ExtractError> {
    let mut module_id: Option<&str> = None;
    let mut declared: Option<IndexSet<String>> = None;
    let mut factory: Option<&Argument<'_>> = None;

    for argument in &call.arguments {
        match argument {
            Argument::StringLiteral(lit) if module_id.is_none() => {
                module_id = Some(lit.value.as_str());
            }
            Argument::ArrayExpression(array) if declared.is_none() => {
                declared = Some(string_elements(array).collect());
            }
            _ => {
                factory = Some(argument);
                break;
            }
        }
    }

    let factory = factory.ok_or(ExtractError::MissingFactory {
        offset: call.span.start,
    })?;

    let function = match factory {
        Argument::FunctionExpression(function) => Some(function),
        _ => None,
    };

    let mut deps = DepSets::default();
    match declared {
        Some(declared) => deps.sync = declared,
        None => {
            let param_count = function.map_or(0, |f| f.params.items.len());
            deps.sync = BUILTIN_MODULES
                .iter()
                .take(param_count)
                .map(|id| id.to_string())
                .collect();
        }
    }

    if let Some(body) = function.and_then(|f| f.body.as_ref()) {
        let mut scanner = FactoryScanner {
            deps: DepSets::default(),
        };
        scanner.visit_function_body(body);
        deps.merge(scanner.deps);
    }

    tracing::trace!(
        "define({}) declares {} sync deps",
        module_id.unwrap_or("<anonymous>"),
        deps.sync.len()
    );

    Ok(deps)
}

/// Top-level walk: finds registration calls and, optionally, free requires.
struct FileScanner {
    include_free_require: bool,
    free: DepSets,
    defines: Vec<DepSets>,
    error: Option<ExtractError>,
}

impl<'a> Visit<'a> for FileScanner {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if self.error.is_some() {
            return;
        }

        if callee_is(&call.callee, DEFINE) {
            match analyze_define(call) {
                Ok(deps) => self.defines.push(deps),
                Err(err) => self.error = Some(err),
            }
            return;
        }

        if self.include_free_require
            && collect_require(&call.callee, &call.arguments, &mut self.free)
        {
            return;
        }

        walk::walk_call_expression(self, call);
    }

    fn visit_new_expression(&mut self, expr: &NewExpression<'a>) {
        if self.error.is_some() {
            return;
        }

        if self.include_free_require
            && collect_require(&expr.callee, &expr.arguments, &mut self.free)
        {
            return;
        }

        walk::walk_new_expression(self, expr);
    }
}

/// Walk of a factory body: collects requires, skips nested registrations.
struct FactoryScanner {
    deps: DepSets,
}

impl<'a> Visit<'a> for FactoryScanner {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if callee_is(&call.callee, DEFINE) {
            return;
        }
        if collect_require(&call.callee, &call.arguments, &mut self.deps) {
            return;
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_new_expression(&mut self, expr: &NewExpression<'a>) {
        if collect_require(&expr.callee, &expr.arguments, &mut self.deps) {
            return;
        }
        walk::walk_new_expression(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(code: &str) -> DependencyInfo {
        extract_source(Path::new("mod.js"), code, true).unwrap()
    }

    #[test]
    fn free_requires_are_sync_deps() {
        let info = deps("var a = require('./a'); var b = require('b'); require('./a');");
        assert!(!info.has_own_registration);
        assert_eq!(info.sync_deps, vec!["./a", "b"]);
        assert!(info.async_deps.is_empty());
    }

    #[test]
    fn array_require_yields_async_deps() {
        let info = deps("require(['./x', './y', 42], function (x, y) {});");
        assert!(info.sync_deps.is_empty());
        assert_eq!(info.async_deps, vec!["./x", "./y"]);
    }

    #[test]
    fn new_require_counts() {
        let info = deps("var Thing = new require('./thing');");
        assert_eq!(info.sync_deps, vec!["./thing"]);
    }

    #[test]
    fn free_requires_ignored_when_disabled() {
        let info = extract_source(Path::new("mod.js"), "require('./a');", false).unwrap();
        assert!(info.sync_deps.is_empty());
    }

    #[test]
    fn declared_array_drives_sync_deps() {
        let info = deps(
            "define('m', ['./a', './b', './a'], function (a, b) { return require('./c'); });",
        );
        assert!(info.has_own_registration);
        assert_eq!(info.sync_deps, vec!["./a", "./b", "./c"]);
    }

    #[test]
    fn param_count_selects_builtins() {
        let info = deps("define(function (require, exports) { require('./a'); });");
        assert_eq!(info.sync_deps, vec!["require", "exports", "./a"]);

        let info = deps("define(function (require, exports, module, extra) {});");
        assert_eq!(info.sync_deps, vec!["require", "exports", "module"]);
    }

    #[test]
    fn object_factory_has_no_deps() {
        let info = deps("define('config', { debug: true });");
        assert!(info.has_own_registration);
        assert!(info.sync_deps.is_empty());
    }

    #[test]
    fn missing_factory_is_fatal() {
        let err = extract_source(Path::new("mod.js"), "define('m', ['./a']);", true).unwrap_err();
        assert!(matches!(err, ExtractError::MissingFactory { .. }));
    }

    #[test]
    fn nested_defines_are_not_descended() {
        let info = deps(
            "define('outer', function (require) {\n\
                 require('./a');\n\
                 define('inner', ['./hidden'], function () { require('./deep'); });\n\
             });",
        );
        assert_eq!(info.sync_deps, vec!["require", "./a"]);
    }

    #[test]
    fn free_requires_come_before_define_deps() {
        let info = deps(
            "require('./setup');\n\
             define('m', ['./dep'], function () {});\n\
             require(['./later']);",
        );
        assert_eq!(info.sync_deps, vec!["./setup", "./dep"]);
        assert_eq!(info.async_deps, vec!["./later"]);
    }

    #[test]
    fn factory_async_requires() {
        let info = deps("define(function (require) { require(['./lazy'], function () {}); });");
        assert_eq!(info.sync_deps, vec!["require"]);
        assert_eq!(info.async_deps, vec!["./lazy"]);
    }

    #[test]
    fn non_literal_require_is_skipped() {
        let info = deps("var name = './a'; require(name); require(`./b`);");
        assert!(info.sync_deps.is_empty());
    }

    #[test]
    fn syntax_error_is_fatal() {
        let err = extract_source(Path::new("broken.js"), "var = ;", true).unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }
}
