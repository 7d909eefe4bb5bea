//! Build command implementation.
//!
//! Loads the config, builds every selected bundle and writes the outputs.

use std::sync::Arc;

use knit::{Bundler, NativeRuntime};
use knit_config::validate_schema;

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::logger::Logger;
use crate::ui;

/// Execute the build command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or any bundle fails. All
/// selected bundles are built before the first one is written, so a failure
/// leaves every target untouched.
pub fn execute(args: BuildArgs, logger: &Logger) -> Result<()> {
    let root = utils::project_root(args.cwd.as_deref())?;
    let config = utils::load_config(&root, args.config.as_deref())?;
    logger.apply_config_level(config.settings.log_level.as_deref());
    validate_schema(&config)?;

    let selected: Vec<_> = config.select(args.only.as_deref()).collect();
    if let Some(target) = args.only.as_ref().filter(|_| selected.is_empty()) {
        return Err(CliError::UnknownTarget(target.clone()));
    }

    let runtime = Arc::new(NativeRuntime::new());
    let bundler = Bundler::new(runtime.clone());

    let mut built = Vec::with_capacity(selected.len());
    for spec in selected {
        let options = spec.to_bundle_options(&root, &config.settings, runtime.as_ref())?;
        tracing::debug!("building {}", options.target.display());
        let output = bundler.bundle(&options)?;
        built.push((options, output));
    }

    for (options, output) in &built {
        bundler.write(options, output)?;
        ui::print_bundle_summary(options, output);
    }

    Ok(())
}
