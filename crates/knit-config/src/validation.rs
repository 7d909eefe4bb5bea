//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::path::{Path, PathBuf};

use knit::Runtime;
use knit::resolve::resolve_file_or_directory;

use crate::config::KnitConfig;
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &KnitConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use knit_config::{BundleSpec, ConfigValidator, KnitConfig, SchemaValidator};
///
/// let mut config = KnitConfig::default();
/// config.bundles.push(BundleSpec {
///     entries: vec!["index.js".into()],
///     target: "out.js".into(),
///     ..Default::default()
/// });
///
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &KnitConfig) -> Result<()> {
        if config.bundles.is_empty() {
            return Err(ConfigError::NoBundles);
        }

        for (bundle, spec) in config.bundles.iter().enumerate() {
            if spec.entries.is_empty() {
                return Err(ConfigError::NoEntries { bundle });
            }

            let invalid = |message: &str| ConfigError::SchemaValidation {
                bundle,
                message: message.to_string(),
            };

            if spec.target.as_os_str().is_empty() {
                return Err(invalid("target cannot be empty"));
            }

            if spec.compress_target.as_ref() == Some(&spec.target) {
                return Err(invalid("compress_target must differ from target"));
            }

            if spec.entry_code.is_some() && spec.entry_code_file.is_some() {
                return Err(invalid(
                    "entry_code and entry_code_file cannot both be set",
                ));
            }

            if spec.ignore_modules.iter().any(|name| name.trim().is_empty()) {
                return Err(invalid("ignore_modules entries cannot be empty"));
            }
        }

        let mut targets: Vec<&PathBuf> = config.bundles.iter().map(|b| &b.target).collect();
        targets.sort();
        if let Some(pair) = targets.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ConfigError::InvalidValue(format!(
                "two bundles write to '{}'",
                pair[0].display()
            )));
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that every entry resolves to a file
/// under the root and that every `entry_code_file` exists.
pub struct FsValidator<'r> {
    root: PathBuf,
    runtime: &'r dyn Runtime,
}

impl<'r> FsValidator<'r> {
    pub fn new(root: impl AsRef<Path>, runtime: &'r dyn Runtime) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            runtime,
        }
    }
}

impl ConfigValidator for FsValidator<'_> {
    fn validate(&self, config: &KnitConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        for (bundle, spec) in config.bundles.iter().enumerate() {
            for entry in &spec.entries {
                let path = self.root.join(entry);
                if resolve_file_or_directory(self.runtime, &path).is_none() {
                    return Err(ConfigError::EntryNotFound { bundle, path });
                }
            }

            if let Some(file) = &spec.entry_code_file {
                let path = self.root.join(file);
                if !self.runtime.is_file(&path) {
                    return Err(ConfigError::EntryCodeFileNotFound { bundle, path });
                }
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &KnitConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &KnitConfig, root: impl AsRef<Path>, runtime: &dyn Runtime) -> Result<()> {
    FsValidator::new(root, runtime).validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BundleSpec;
    use knit::MemoryRuntime;

    fn spec(entry: &str, target: &str) -> BundleSpec {
        BundleSpec {
            entries: vec![PathBuf::from(entry)],
            target: PathBuf::from(target),
            ..Default::default()
        }
    }

    fn config(bundles: Vec<BundleSpec>) -> KnitConfig {
        KnitConfig {
            bundles,
            ..Default::default()
        }
    }

    #[test]
    fn schema_validator_rejects_empty_config() {
        let result = SchemaValidator.validate(&KnitConfig::default());
        assert!(matches!(result.unwrap_err(), ConfigError::NoBundles));
    }

    #[test]
    fn schema_validator_rejects_empty_entries() {
        let mut bundle = spec("a.js", "out.js");
        bundle.entries.clear();
        let result = SchemaValidator.validate(&config(vec![spec("a.js", "x.js"), bundle]));
        assert!(matches!(result.unwrap_err(), ConfigError::NoEntries { bundle: 1 }));
    }

    #[test]
    fn schema_validator_rejects_same_compress_target() {
        let mut bundle = spec("a.js", "out.js");
        bundle.compress_target = Some(PathBuf::from("out.js"));
        let result = SchemaValidator.validate(&config(vec![bundle]));
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::SchemaValidation { .. }
        ));
    }

    #[test]
    fn schema_validator_rejects_both_entry_codes() {
        let mut bundle = spec("a.js", "out.js");
        bundle.entry_code = Some("require('a');".to_string());
        bundle.entry_code_file = Some(PathBuf::from("boot.js"));
        assert!(SchemaValidator.validate(&config(vec![bundle])).is_err());
    }

    #[test]
    fn schema_validator_rejects_shared_targets() {
        let result = SchemaValidator.validate(&config(vec![spec("a.js", "out.js"), spec("b.js", "out.js")]));
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidValue(_)));
    }

    #[test]
    fn schema_validator_accepts_valid_config() {
        let mut prod = spec("a.js", "prod.js");
        prod.compress_target = Some(PathBuf::from("prod.min.js"));
        assert!(validate_schema(&config(vec![spec("a.js", "dev.js"), prod])).is_ok());
    }

    #[test]
    fn fs_validator_checks_entries() {
        let runtime = MemoryRuntime::new().with_file("/app/src/main.js", "");

        let ok = config(vec![spec("src/main", "out.js")]);
        assert!(validate_fs(&ok, "/app", &runtime).is_ok());

        let missing = config(vec![spec("src/other.js", "out.js")]);
        assert!(matches!(
            validate_fs(&missing, "/app", &runtime).unwrap_err(),
            ConfigError::EntryNotFound { bundle: 0, .. }
        ));
    }

    #[test]
    fn fs_validator_checks_entry_code_file() {
        let runtime = MemoryRuntime::new().with_file("/app/main.js", "");
        let mut bundle = spec("main.js", "out.js");
        bundle.entry_code_file = Some(PathBuf::from("boot.js"));

        assert!(matches!(
            validate_fs(&config(vec![bundle]), "/app", &runtime).unwrap_err(),
            ConfigError::EntryCodeFileNotFound { .. }
        ));
    }
}
