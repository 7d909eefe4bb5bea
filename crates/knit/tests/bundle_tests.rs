//! End-to-end bundling against real files.

mod helpers;

use helpers::{Project, bundler, header, position, proxy};
use knit::{BundleError, Diagnostic, MinifyLevel, ResolveError};

#[test]
fn dependency_is_registered_before_dependent() {
    let project = Project::new();
    project
        .file("a.js", "var b = require('./b');\nb();")
        .file("b.js", "module.exports = function () {};");

    let options = project
        .options(["a.js"], "out.js")
        .entry_code("require('a');");
    let (output, _) = bundler().run(&options).unwrap();

    let expected = format!(
        "{}module.exports = function () {{}};\n}});\n\n{}var b = require('./b');\nb();\n}});\nrequire('a');",
        header("b"),
        header("a")
    );
    assert_eq!(output.code, expected);
    assert_eq!(project.read("out.js"), expected);
    assert!(!output.code.contains("function (require) {return"));
}

#[test]
fn ignored_package_is_left_out() {
    let project = Project::new();
    project
        .file("app.js", "var React = require('react');\nvar dom = require('react/dom');")
        .file("node_modules/react/index.js", "module.exports = 'react';")
        .file("node_modules/react/dom.js", "module.exports = 'dom';");

    let options = project
        .options(["app.js"], "out.js")
        .ignore_modules(["react"]);
    let output = bundler().bundle(&options).unwrap();

    assert_eq!(output.modules.len(), 1);
    assert!(!output.code.contains("define('react"));
    assert!(output.code.starts_with(&header("app")));
    assert!(output.code.contains("var React = require('react');"));
    assert_eq!(output.dropped_edges(), 0);
    assert!(
        output
            .diagnostics
            .iter()
            .all(|d| matches!(d, Diagnostic::Ignored { .. }))
    );
}

#[test]
fn ignoring_drops_transitive_subgraph() {
    let project = Project::new();
    project
        .file("app.js", "require('ui'); require('./shared');")
        .file("shared.js", "")
        .file("node_modules/ui/index.js", "require('ui-internals'); require('../../shared');")
        .file("node_modules/ui-internals/index.js", "");

    let options = project.options(["app.js"], "out.js").ignore_modules(["ui"]);
    let output = bundler().bundle(&options).unwrap();

    let ids: Vec<&str> = output.modules.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["shared", "app"]);
}

#[test]
fn aliases_share_one_registration() {
    let project = Project::new();
    project
        .file("main.js", "require('pkg/lib/x'); require('pkg');")
        .file("node_modules/pkg/package.json", r#"{"name":"pkg","main":"index.js"}"#)
        .file("node_modules/pkg/index.js", "module.exports = require('./lib/x.js');")
        .file("node_modules/pkg/lib/x.js", "module.exports = 'x';");

    let output = bundler()
        .bundle(&project.options(["main.js"], "out.js"))
        .unwrap();

    assert_eq!(output.code.matches("module.exports = 'x';").count(), 1);
    assert_eq!(output.code.matches(&header("pkg/lib/x")).count(), 1);
    assert_eq!(
        output.code.matches(&proxy("pkg/lib/x.js", "pkg/lib/x")).count(),
        1
    );

    let x = output
        .modules
        .iter()
        .find(|m| m.id == "pkg/lib/x")
        .unwrap();
    assert_eq!(x.proxies, vec!["pkg/lib/x.js"]);
}

#[test]
fn bare_package_with_deeper_main_gets_proxy() {
    let project = Project::new();
    project
        .file("main.js", "require('hot');")
        .file(
            "node_modules/hot/package.json",
            r#"{"name":"hot","main":"./lib/index.js"}"#,
        )
        .file("node_modules/hot/lib/index.js", "module.exports = {};");

    let output = bundler()
        .bundle(&project.options(["main.js"], "out.js"))
        .unwrap();

    let primary = position(&output.code, &header("hot/lib/index"));
    let forward = position(&output.code, &proxy("hot", "hot/lib/index"));
    let main = position(&output.code, &header("main"));
    assert!(primary < forward && forward < main);
}

#[test]
fn variant_entry_has_no_proxy() {
    let project = Project::new();
    project.file("node_modules/rhl/lib/patch.dev.js", "module.exports = 'patch';");

    let output = bundler()
        .bundle(&project.options(["node_modules/rhl/lib/patch.dev.js"], "out.js"))
        .unwrap();

    assert!(output.code.starts_with(&header("rhl/lib/patch")));
    assert!(!output.code.contains("define('rhl/lib/patch.dev'"));
    assert_eq!(output.code.matches("define(").count(), 1);
    assert!(output.modules[0].proxies.is_empty());
}

#[test]
fn proxy_clashing_with_local_module_is_fatal() {
    let project = Project::new();
    project
        .file("main.js", "require('./hot'); require('hot');")
        .file("hot.js", "module.exports = 'local';")
        .file("node_modules/hot/package.json", r#"{"main":"lib/index.js"}"#)
        .file("node_modules/hot/lib/index.js", "module.exports = 'package';");

    let err = bundler()
        .run(&project.options(["main.js"], "out.js"))
        .unwrap_err();

    assert!(matches!(err, BundleError::DuplicateModuleId { ref id, .. } if id == "hot"));
    assert!(!project.exists("out.js"));
}

#[test]
fn nested_package_versions_share_an_id() {
    let project = Project::new();
    project
        .file("main.js", "require('dep'); require('outer');")
        .file("node_modules/dep/index.js", "// v2")
        .file("node_modules/outer/index.js", "require('dep');")
        .file("node_modules/outer/node_modules/dep/index.js", "// v1");

    let err = bundler()
        .bundle(&project.options(["main.js"], "out.js"))
        .unwrap_err();

    assert!(matches!(err, BundleError::DuplicateModuleId { ref id, .. } if id == "dep"));
    assert!(err.to_string().contains("nested copies"));
}

#[test]
fn cyclic_modules_appear_once() {
    let project = Project::new();
    project
        .file("a.js", "exports.a = 1; require('./b');")
        .file("b.js", "exports.b = 1; require('./a');");

    let output = bundler()
        .bundle(&project.options(["a.js"], "out.js"))
        .unwrap();

    assert_eq!(output.code.matches("exports.a = 1;").count(), 1);
    assert_eq!(output.code.matches("exports.b = 1;").count(), 1);
    assert!(position(&output.code, &header("b")) < position(&output.code, &header("a")));
}

#[test]
fn self_registering_module_is_verbatim() {
    let amd = "define('legacy', ['require'], function (require) { return 42; });";
    let project = Project::new();
    project
        .file("app.js", "require('./legacy'); require('./lib/../legacy.js');")
        .file("legacy.js", amd);

    let output = bundler()
        .bundle(&project.options(["app.js"], "out.js"))
        .unwrap();

    assert!(output.code.starts_with(&format!("{amd}\n")));
    assert!(!output.code.contains("function (require) {return require("));
    assert!(output.modules[0].self_registering);
}

#[test]
fn nested_node_modules_are_searched_upward() {
    let project = Project::new();
    project
        .file("src/deep/app.js", "require('outer');")
        .file("node_modules/outer/index.js", "require('inner');")
        .file("node_modules/outer/node_modules/inner/index.js", "// nested copy")
        .file("node_modules/inner/index.js", "// hoisted copy");

    let output = bundler()
        .bundle(&project.options(["src/deep/app.js"], "out.js"))
        .unwrap();

    assert!(output.code.contains("// nested copy"));
    assert!(!output.code.contains("// hoisted copy"));
    assert_eq!(output.modules.len(), 3);
}

#[test]
fn missing_bare_package_is_tolerated() {
    let project = Project::new();
    project.file("a.js", "require('not-installed');");

    let output = bundler()
        .bundle(&project.options(["a.js"], "out.js"))
        .unwrap();

    assert_eq!(output.modules.len(), 1);
    assert_eq!(output.dropped_edges(), 1);
}

#[test]
fn missing_bare_package_fails_in_strict_mode() {
    let project = Project::new();
    project.file("a.js", "require('not-installed');");

    let options = project.options(["a.js"], "out.js").strict_bare(true);
    let err = bundler().run(&options).unwrap_err();

    assert!(matches!(err, BundleError::UnresolvedBare { ref specifier, .. } if specifier == "not-installed"));
    assert!(!project.exists("out.js"));
}

#[test]
fn missing_relative_dependency_writes_nothing() {
    let project = Project::new();
    project.file("a.js", "require('./gone');");

    let options = project
        .options(["a.js"], "dist/out.js")
        .compress_target("dist/out.min.js");
    let err = bundler().run(&options).unwrap_err();

    assert!(matches!(
        err,
        BundleError::Resolve(ResolveError::RelativeNotFound { .. })
    ));
    assert!(!project.exists("dist/out.js"));
    assert!(!project.exists("dist/out.min.js"));
}

#[test]
fn malformed_registration_is_fatal() {
    let project = Project::new();
    project.file("a.js", "define('a', ['./b']);");

    let err = bundler()
        .bundle(&project.options(["a.js"], "out.js"))
        .unwrap_err();
    assert!(matches!(err, BundleError::Extract { .. }));
}

#[test]
fn bundling_is_idempotent() {
    let project = Project::new();
    project
        .file("a.js", "require('./b'); require('./c'); require('pkg');")
        .file("b.js", "require('./c');")
        .file("c.js", "")
        .file("node_modules/pkg/package.json", r#"{"main":"lib/pkg.js"}"#)
        .file("node_modules/pkg/lib/pkg.js", "require('./util');")
        .file("node_modules/pkg/lib/util.js", "");

    let options = project
        .options(["a.js"], "out.js")
        .compress_target("out.min.js")
        .minify(MinifyLevel::Syntax);

    let first = bundler().bundle(&options).unwrap();
    let second = bundler().bundle(&options).unwrap();
    assert_eq!(first.code, second.code);
    assert_eq!(first.minified, second.minified);
}

#[test]
fn minified_output_is_written_alongside() {
    let project = Project::new();
    project
        .file("a.js", "var helper = require('./b');\nhelper('hello');")
        .file("b.js", "module.exports = function (longParameterName) { return longParameterName; };");

    let options = project
        .options(["a.js"], "out.js")
        .compress_target("out.min.js")
        .entry_code("require('a');");
    let (output, written) = bundler().run(&options).unwrap();

    assert_eq!(written.len(), 2);
    let minified = project.read("out.min.js");
    assert_eq!(Some(&minified), output.minified.as_ref());
    assert!(minified.len() < output.code.len());
    assert!(!minified.contains("longParameterName"));
}
