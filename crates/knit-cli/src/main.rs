//! Entry point for the `knit` binary.

use clap::Parser;
use knit_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let logger = logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init(args.no_color, args.quiet);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args, &logger),
        cli::Command::Bundle(bundle_args) => commands::bundle_execute(bundle_args),
        cli::Command::Check(check_args) => commands::check_execute(check_args, &logger),
    };

    result.map_err(error::cli_error_to_miette)
}
