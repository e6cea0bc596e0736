//! fob-infer CLI entry point.

use clap::Parser;
use fob_infer_cli::{cli, commands, error, logger};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match &args.command {
        cli::Command::Symbols(symbols) => commands::symbols_execute(&args.global, symbols),
        cli::Command::Lookup(lookup) => commands::lookup_execute(&args.global, lookup),
    };

    result.map_err(error::cli_error_to_miette)
}
