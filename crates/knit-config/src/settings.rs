//! Settings shared by every bundle in a config file.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Default `tracing` filter when `RUST_LOG` is not set.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Collect `require` calls outside `define` factories.
    #[serde(default = "default_true")]
    pub free_require: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            log_level: None,
            free_require: true,
        }
    }
}
