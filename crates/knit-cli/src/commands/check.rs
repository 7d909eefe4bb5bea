//! Check command implementation.
//!
//! Validates the configuration and its entry files without building.

use knit::NativeRuntime;
use knit_config::validate_fs;

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::logger::Logger;
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Locate and load the config (or the `--config` file)
/// 2. Schema checks: bundles, entries, targets, entry code
/// 3. Every entry resolves to a file under the project root
pub fn execute(args: CheckArgs, logger: &Logger) -> Result<()> {
    let root = utils::project_root(args.cwd.as_deref())?;

    ui::info("Checking configuration...");
    let config = utils::load_config(&root, args.config.as_deref())?;
    logger.apply_config_level(config.settings.log_level.as_deref());

    validate_fs(&config, &root, &NativeRuntime::new())?;

    for bundle in &config.bundles {
        let entries: Vec<String> = bundle
            .entries
            .iter()
            .map(|entry| entry.display().to_string())
            .collect();
        ui::success(&format!("{} <- {}", bundle.target.display(), entries.join(", ")));
    }

    ui::success("All checks passed!");
    Ok(())
}
