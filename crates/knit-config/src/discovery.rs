//! File-based config discovery for CLI use
//!
//! Handles finding and loading knit configuration files from the filesystem.
//! Values are layered with figment: built-in defaults, then the config file,
//! then `KNIT_`-prefixed environment variables (`__` separates nested keys,
//! e.g. `KNIT_SETTINGS__LOG_LEVEL=debug`).

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use knit::{NativeRuntime, Runtime};
use serde_json::Value;

use crate::config::KnitConfig;
use crate::error::{ConfigError, Result};

/// Dedicated config file name.
pub const CONFIG_FILE: &str = "knit.toml";

/// Field holding the config inside `package.json`.
pub const PACKAGE_JSON_FIELD: &str = "knit";

const ENV_PREFIX: &str = "KNIT_";

/// File-based configuration discovery
///
/// Searches for knit configuration in conventional locations and loads it.
/// Library users should use `KnitConfig::from_value()` directly.
///
/// # Example
///
/// ```no_run
/// use knit_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery<'r> {
    root: PathBuf,
    runtime: &'r dyn Runtime,
}

impl ConfigDiscovery<'static> {
    /// Create a discovery rooted at `root` using the native filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        static NATIVE: NativeRuntime = NativeRuntime;
        Self::with_runtime(root, &NATIVE)
    }
}

impl<'r> ConfigDiscovery<'r> {
    pub fn with_runtime(root: impl AsRef<Path>, runtime: &'r dyn Runtime) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            runtime,
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: knit.toml
    /// 2. package.json (knit field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if self.runtime.is_file(&toml_path) {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        let parsed = self.read_json(&pkg_path).ok()?;
        parsed
            .get(PACKAGE_JSON_FIELD)
            .is_some_and(|field| !field.is_null())
            .then_some(pkg_path)
    }

    /// Load config from the discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<KnitConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config from a specific file path.
    ///
    /// `package.json` files are read from their `knit` field; anything else
    /// is parsed as TOML.
    pub fn load_from(&self, path: &Path) -> Result<KnitConfig> {
        let path = self.root.join(path);
        if !self.runtime.is_file(&path) {
            return Err(ConfigError::FileNotFound(path));
        }

        tracing::debug!("loading config from {}", path.display());

        let figment = Figment::new().merge(Serialized::defaults(KnitConfig::default()));
        let figment = if path.file_name().is_some_and(|name| name == "package.json") {
            figment.merge(Serialized::defaults(self.package_json_field(&path)?))
        } else {
            let content = self.read(&path)?;
            figment.merge(Toml::string(&content))
        };

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::InvalidValue(format!("{}: {e}", path.display())))
    }

    fn package_json_field(&self, path: &Path) -> Result<Value> {
        let mut parsed = self.read_json(path)?;
        match parsed.get_mut(PACKAGE_JSON_FIELD).map(Value::take) {
            Some(Value::Null) | None => Err(ConfigError::InvalidValue(format!(
                "{}: add a '{PACKAGE_JSON_FIELD}' field to your package.json",
                path.display()
            ))),
            Some(value) => Ok(value),
        }
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.runtime
            .read_to_string(path)
            .map_err(|e| ConfigError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    fn read_json(&self, path: &Path) -> Result<Value> {
        let content = self.read(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidValue(format!("{}: invalid JSON: {e}", path.display())))
    }
}

/// Discover and load config from `root` (convenience function)
///
/// # Example
///
/// ```no_run
/// use knit_config::discover;
///
/// let config = discover(".").unwrap();
/// ```
pub fn discover(root: impl AsRef<Path>) -> Result<KnitConfig> {
    ConfigDiscovery::new(root).load()
}
