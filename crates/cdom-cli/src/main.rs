//! cdom CLI - Command-line interface for the cdom binding resolver
//!
//! Resolves names in C and C++ syntax trees and explains the problems it reports.

mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;
use commands::Commands;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli);

    match cli.command {
        Commands::Resolve(args) => args.run(),
        Commands::Explain(args) => args.run(),
    }
}
