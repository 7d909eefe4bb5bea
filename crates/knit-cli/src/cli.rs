//! Command-line interface definition for knit.
//!
//! - `knit build` - Build every bundle listed in the config
//! - `knit bundle` - One-off bundle from command-line arguments
//! - `knit check` - Validate the config and its entry files

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use knit::MinifyLevel;

/// knit - bundle CommonJS modules into named AMD registrations
#[derive(Parser, Debug)]
#[command(
    name = "knit",
    version,
    about = "Bundle CommonJS modules into named AMD registrations",
    long_about = "knit follows every require() from the given entry files, resolves\n\
                  specifiers the way Node does, and writes each module once, wrapped in\n\
                  a define() call, dependencies first."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the bundles listed in knit.toml (or package.json "knit")
    Build(BuildArgs),

    /// Bundle entry files without a config file
    ///
    /// Examples:
    ///   knit bundle src/main.js -o dist/app.js
    ///   knit bundle src/main.js -o dist/app.js --ignore react --minify-target dist/app.min.js
    Bundle(BundleArgs),

    /// Validate the configuration and entry files without building
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Config file, relative to the project root
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Only build the bundle writing to this target
    #[arg(long, value_name = "TARGET")]
    pub only: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BundleArgs {
    /// Entry files, bundled in order
    #[arg(required = true, value_name = "ENTRY")]
    pub entries: Vec<PathBuf>,

    /// Output file for the combined bundle
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Package provided by the host page; may be repeated
    #[arg(long = "ignore", value_name = "PKG")]
    pub ignore: Vec<String>,

    /// Also write a minified bundle here
    #[arg(long, value_name = "FILE")]
    pub minify_target: Option<PathBuf>,

    /// Minification level for --minify-target
    #[arg(long, value_name = "LEVEL", value_parser = parse_minify_level, requires = "minify_target")]
    pub minify: Option<MinifyLevel>,

    /// JavaScript appended after all modules
    #[arg(long, value_name = "JS")]
    pub entry_code: Option<String>,

    /// Fail when a bare package cannot be found
    #[arg(long)]
    pub strict: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Config file, relative to the project root
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

fn parse_minify_level(s: &str) -> Result<MinifyLevel, String> {
    MinifyLevel::parse(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_bundle_command() {
        let cli = Cli::try_parse_from([
            "knit",
            "bundle",
            "a.js",
            "b.js",
            "-o",
            "out.js",
            "--ignore",
            "react",
            "--ignore",
            "jquery",
            "--minify-target",
            "out.min.js",
            "--minify",
            "syntax",
        ])
        .unwrap();

        let Command::Bundle(args) = cli.command else {
            panic!("expected bundle command");
        };
        assert_eq!(args.entries, vec![PathBuf::from("a.js"), PathBuf::from("b.js")]);
        assert_eq!(args.ignore, vec!["react", "jquery"]);
        assert_eq!(args.minify, Some(MinifyLevel::Syntax));
    }

    #[test]
    fn minify_requires_minify_target() {
        let result = Cli::try_parse_from(["knit", "bundle", "a.js", "-o", "out.js", "--minify", "syntax"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_minify_level() {
        let result = Cli::try_parse_from([
            "knit",
            "bundle",
            "a.js",
            "-o",
            "out.js",
            "--minify-target",
            "out.min.js",
            "--minify",
            "extreme",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["knit", "-v", "-q", "check"]).is_err());
    }
}
