//! High-level configuration structure for knit.
//!
//! A config file lists one or more bundles. Each [`BundleSpec`] converts into
//! the core's [`knit::BundleOptions`] once a root directory is known.
//! For file discovery, see the `discovery` module.

use std::path::{Path, PathBuf};

use knit::{BundleOptions, MinifyLevel, Runtime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::settings::GlobalSettings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnitConfig {
    #[serde(default, alias = "bundle")]
    pub bundles: Vec<BundleSpec>,

    #[serde(default)]
    pub settings: GlobalSettings,
}

/// One output bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSpec {
    /// Entry files, relative to the root.
    #[serde(default)]
    pub entries: Vec<PathBuf>,

    /// Top-level packages provided by the host environment.
    #[serde(default, alias = "ignoreModules")]
    pub ignore_modules: Vec<String>,

    /// Output path of the combined text.
    #[serde(default)]
    pub target: PathBuf,

    /// Output path of the minified variant.
    #[serde(default, alias = "compressTarget", skip_serializing_if = "Option::is_none")]
    pub compress_target: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<MinifyLevel>,

    /// Literal snippet appended to the bundle.
    #[serde(default, alias = "entryCode", skip_serializing_if = "Option::is_none")]
    pub entry_code: Option<String>,

    /// File whose contents are appended to the bundle.
    #[serde(default, alias = "entryCodeFile", skip_serializing_if = "Option::is_none")]
    pub entry_code_file: Option<PathBuf>,

    /// Fail on bare specifiers that cannot be found.
    #[serde(default)]
    pub strict: bool,
}

impl KnitConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use knit_config::KnitConfig;
    /// use serde_json::json;
    /// use std::path::PathBuf;
    ///
    /// let value = json!({
    ///     "bundles": [{
    ///         "entries": ["src/main.js"],
    ///         "target": "dist/bundle.js",
    ///         "ignore_modules": ["react"]
    ///     }]
    /// });
    ///
    /// let config = KnitConfig::from_value(value).unwrap();
    /// assert_eq!(config.bundles[0].entries, vec![PathBuf::from("src/main.js")]);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Bundles whose target matches `target`, or all of them when `None`.
    pub fn select<'a>(&'a self, target: Option<&'a Path>) -> impl Iterator<Item = &'a BundleSpec> {
        self.bundles
            .iter()
            .filter(move |bundle| target.is_none_or(|t| bundle.target == t))
    }
}

impl BundleSpec {
    /// Build core options for this bundle.
    ///
    /// `entry_code_file` is read through `runtime`, relative to `root`.
    pub fn to_bundle_options(
        &self,
        root: &Path,
        settings: &GlobalSettings,
        runtime: &dyn Runtime,
    ) -> ConfigResult<BundleOptions> {
        let mut options = BundleOptions::new(self.entries.iter().cloned(), &self.target, root)
            .ignore_modules(self.ignore_modules.iter().cloned())
            .strict_bare(self.strict)
            .include_free_require(settings.free_require);

        if let Some(compress_target) = &self.compress_target {
            options = options.compress_target(compress_target);
        }
        if let Some(level) = self.minify {
            options = options.minify(level);
        }

        if let Some(code) = self.trailer(root, runtime)? {
            options = options.entry_code(code);
        }

        Ok(options)
    }

    fn trailer(&self, root: &Path, runtime: &dyn Runtime) -> ConfigResult<Option<String>> {
        if let Some(code) = &self.entry_code {
            return Ok(Some(code.clone()));
        }

        let Some(file) = &self.entry_code_file else {
            return Ok(None);
        };

        let path = root.join(file);
        runtime
            .read_to_string(&path)
            .map(Some)
            .map_err(|e| ConfigError::Read {
                path,
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knit::MemoryRuntime;
    use serde_json::json;

    #[test]
    fn from_value_accepts_camel_case_aliases() {
        let value = json!({
            "bundles": [{
                "entries": ["index.js"],
                "target": "dist/dev.js",
                "ignoreModules": ["react"],
                "compressTarget": "dist/dev.min.js",
                "entryCode": "require('index');",
                "minify": true
            }]
        });

        let config = KnitConfig::from_value(value).unwrap();
        let bundle = &config.bundles[0];
        assert_eq!(bundle.ignore_modules, vec!["react"]);
        assert_eq!(bundle.compress_target, Some(PathBuf::from("dist/dev.min.js")));
        assert_eq!(bundle.minify, Some(MinifyLevel::Identifiers));
        assert_eq!(bundle.entry_code.as_deref(), Some("require('index');"));
    }

    #[test]
    fn to_value_round_trips_minify_level() {
        let config = KnitConfig {
            bundles: vec![BundleSpec {
                entries: vec![PathBuf::from("a.js")],
                target: PathBuf::from("out.js"),
                minify: Some(MinifyLevel::Whitespace),
                ..Default::default()
            }],
            ..Default::default()
        };

        let value = config.to_value().unwrap();
        assert_eq!(value["bundles"][0]["minify"], json!("whitespace"));
        assert!(value["bundles"][0].get("entry_code").is_none());
    }

    #[test]
    fn select_filters_by_target() {
        let config = KnitConfig {
            bundles: vec![
                BundleSpec {
                    target: PathBuf::from("dev.js"),
                    ..Default::default()
                },
                BundleSpec {
                    target: PathBuf::from("prod.js"),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        assert_eq!(config.select(None).count(), 2);
        let only: Vec<_> = config.select(Some(Path::new("prod.js"))).collect();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].target, PathBuf::from("prod.js"));
    }

    #[test]
    fn to_bundle_options_reads_entry_code_file() {
        let runtime = MemoryRuntime::new().with_file("/app/boot.js", "require('main');");
        let spec = BundleSpec {
            entries: vec![PathBuf::from("main.js")],
            target: PathBuf::from("out.js"),
            entry_code_file: Some(PathBuf::from("boot.js")),
            strict: true,
            ..Default::default()
        };

        let options = spec
            .to_bundle_options(Path::new("/app"), &GlobalSettings::default(), &runtime)
            .unwrap();
        assert_eq!(options.entry_code.as_deref(), Some("require('main');"));
        assert!(options.strict_bare);
        assert!(options.include_free_require);
        assert_eq!(options.root, PathBuf::from("/app"));
    }

    #[test]
    fn missing_entry_code_file_is_an_error() {
        let runtime = MemoryRuntime::new();
        let spec = BundleSpec {
            entries: vec![PathBuf::from("main.js")],
            target: PathBuf::from("out.js"),
            entry_code_file: Some(PathBuf::from("boot.js")),
            ..Default::default()
        };

        let err = spec
            .to_bundle_options(Path::new("/app"), &GlobalSettings::default(), &runtime)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
