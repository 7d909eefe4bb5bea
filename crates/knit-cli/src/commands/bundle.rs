//! Bundle command implementation: a one-off build with no config file.

use std::path::PathBuf;
use std::sync::Arc;

use knit::{BundleOptions, Bundler, NativeRuntime};

use crate::cli::BundleArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the bundle command.
pub fn execute(args: BundleArgs) -> Result<()> {
    let root = utils::project_root(args.cwd.as_deref())?;
    let options = options_from_args(args, root);

    let bundler = Bundler::new(Arc::new(NativeRuntime::new()));
    let (output, _) = bundler.run(&options)?;
    ui::print_bundle_summary(&options, &output);

    Ok(())
}

fn options_from_args(args: BundleArgs, root: PathBuf) -> BundleOptions {
    let mut options = BundleOptions::new(args.entries, args.output, root)
        .ignore_modules(args.ignore)
        .strict_bare(args.strict);

    if let Some(path) = args.minify_target {
        options = options.compress_target(path);
    }
    if let Some(level) = args.minify {
        options = options.minify(level);
    }
    if let Some(code) = args.entry_code {
        options = options.entry_code(code);
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use knit::MinifyLevel;

    #[test]
    fn args_map_onto_options() {
        let args = BundleArgs {
            entries: vec![PathBuf::from("src/main.js")],
            output: PathBuf::from("dist/app.js"),
            ignore: vec!["react".into()],
            minify_target: Some(PathBuf::from("dist/app.min.js")),
            minify: Some(MinifyLevel::Whitespace),
            entry_code: Some("require('src/main');".into()),
            strict: true,
            cwd: None,
        };

        let options = options_from_args(args, PathBuf::from("/project"));
        assert_eq!(options.entries, vec![PathBuf::from("src/main.js")]);
        assert_eq!(options.ignore_modules, vec!["react"]);
        assert_eq!(options.effective_minify(), Some(MinifyLevel::Whitespace));
        assert_eq!(options.entry_code.as_deref(), Some("require('src/main');"));
        assert!(options.strict_bare);
        assert!(options.include_free_require);
    }
}
