//! Module wrapping.
//!
//! Turns a [`ModuleUnit`] into registration statements: one primary
//! `define` under the canonical id, plus one forwarding `define` per extra
//! identifier the module was required under.

use std::path::Path;

use crate::graph::{AliasMap, ModuleUnit};
use crate::module_id::{
    is_bare_package_name, normalize_path, strip_js_extension, strip_variant_suffix,
};
use crate::package_json::{PackageJson, package_dir_of};
use crate::runtime::Runtime;

/// A unit ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedUnit {
    pub file_path: String,
    /// Id of the primary registration.
    pub canonical_id: String,
    /// Ids that received a forwarding registration.
    pub proxies: Vec<String>,
    pub owns_define_call: bool,
    pub code: String,
}

/// Wraps units using package metadata read through a runtime.
pub struct Wrapper<'r> {
    runtime: &'r dyn Runtime,
}

impl<'r> Wrapper<'r> {
    pub fn new(runtime: &'r dyn Runtime) -> Self {
        Self { runtime }
    }

    /// Wrap `unit` using the identifiers recorded for it in `aliases`.
    pub fn wrap(&self, unit: &ModuleUnit, aliases: &AliasMap) -> WrappedUnit {
        let mut ids = aliases.sorted_ids(&unit.file_path);
        if ids.is_empty() {
            ids.push(strip_js_extension(&unit.package_id).to_string());
        }

        let mut canonical_id = strip_variant_suffix(&ids[0]).to_string();

        if is_bare_package_name(&canonical_id) {
            if let Some(deeper) = self.deeper_main_id(unit, &canonical_id) {
                tracing::debug!("'{}' registers as '{}'", canonical_id, deeper);
                ids.push(std::mem::replace(&mut canonical_id, deeper));
            }
        }

        if unit.owns_define_call {
            return WrappedUnit {
                file_path: unit.file_path.clone(),
                canonical_id,
                proxies: Vec::new(),
                owns_define_call: true,
                code: unit.raw_text.clone(),
            };
        }

        // The first id is the one the primary registration stands for, even
        // after its variant suffix was stripped.
        let mut proxies: Vec<String> = Vec::new();
        for id in ids.into_iter().skip(1) {
            if id != canonical_id && !proxies.contains(&id) {
                proxies.push(id);
            }
        }

        let mut code = wrap_body(&canonical_id, &unit.raw_text);
        for alias in &proxies {
            code.push_str(&proxy_registration(alias, &canonical_id));
        }

        WrappedUnit {
            file_path: unit.file_path.clone(),
            canonical_id,
            proxies,
            owns_define_call: false,
            code,
        }
    }

    /// `<name>/<main>` without `.js`, when the package's main is deeper than
    /// its root.
    fn deeper_main_id(&self, unit: &ModuleUnit, package_name: &str) -> Option<String> {
        let dir = package_dir_of(&unit.file_path)?;
        let pkg = PackageJson::load(self.runtime, &dir)?;
        let main = pkg.deeper_main()?;
        let id = normalize_path(&Path::new(package_name).join(main));
        Some(strip_js_extension(&id).to_string())
    }
}

/// `define('<id>', function (require, exports, module) {<body>\n});\n`
pub fn wrap_body(id: &str, body: &str) -> String {
    format!(
        "define('{}', function (require, exports, module) {{{}\n}});\n",
        escape_id(id),
        body
    )
}

/// `\ndefine('<alias>', function (require) {return require('<id>');});`
pub fn proxy_registration(alias: &str, id: &str) -> String {
    format!(
        "\ndefine('{}', function (require) {{return require('{}');}});",
        escape_id(alias),
        escape_id(id)
    )
}

fn escape_id(id: &str) -> String {
    id.replace('\\', "\\\\").replace('\'', "\\'")
}
