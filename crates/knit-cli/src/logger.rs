//! Logging infrastructure for the knit CLI.
//!
//! Structured logging through the `tracing` ecosystem. The filter is chosen in
//! this order:
//!
//! 1. `--verbose`: debug for the knit crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. `settings.log_level` from the config file, applied once it is loaded
//! 5. info for the knit crates
//!
//! ```rust,no_run
//! use knit_cli::logger::init_logger;
//!
//! let logger = init_logger(false, false, false);
//! logger.apply_config_level(Some("knit=debug"));
//! tracing::info!("starting build");
//! ```

use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

const VERBOSE_FILTER: &str = "knit=debug,knit_config=debug,knit_cli=debug";
const QUIET_FILTER: &str = "knit=error,knit_config=error,knit_cli=error";
const DEFAULT_FILTER: &str = "knit=info,knit_config=info,knit_cli=info";

/// Handle to the installed subscriber.
pub struct Logger {
    handle: reload::Handle<EnvFilter, Registry>,
    /// Set when a flag or `RUST_LOG` chose the filter; config levels are then ignored.
    pinned: bool,
}

/// Initialize the tracing subscriber. Call once, before any logging occurs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) -> Logger {
    let (filter, pinned) = if verbose {
        (EnvFilter::new(VERBOSE_FILTER), true)
    } else if quiet {
        (EnvFilter::new(QUIET_FILTER), true)
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, true),
            Err(_) => (EnvFilter::new(DEFAULT_FILTER), false),
        }
    };

    let (filter, handle) = reload::Layer::new(filter);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    Logger { handle, pinned }
}

impl Logger {
    /// Switch to the config file's `log_level` unless a flag or `RUST_LOG`
    /// already decided. A directive that does not parse is reported and skipped.
    pub fn apply_config_level(&self, level: Option<&str>) {
        let Some(level) = level.filter(|_| !self.pinned) else {
            return;
        };

        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    tracing::warn!("could not apply log level '{level}': {e}");
                }
            }
            Err(e) => tracing::warn!("ignoring invalid log_level '{level}': {e}"),
        }
    }
}
