//! Berth CLI - toolchain alias resolution and command dispatch

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use berth::core::errors::ToolchainError;
use cli::{Cli, Commands};
use commands::GlobalOptions;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            match e.downcast_ref::<ToolchainError>() {
                Some(err) => eprint!("{}", err.to_diagnostic().format(color)),
                None => eprintln!("error: {:#}", e),
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("berth=debug")
    } else {
        EnvFilter::new("berth=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let options = GlobalOptions::from_cli(&cli);

    // Execute command
    match cli.command {
        Commands::Toolchain(args) => commands::toolchain::execute(args, options).map(|_| 0),
        Commands::Completions(args) => commands::completions::execute(args).map(|_| 0),
        Commands::External(argv) => commands::dispatch::execute(argv, options),
    }
}
