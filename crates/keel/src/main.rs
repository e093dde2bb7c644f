//! Keel CLI - Extension catalogs from multiple registries
//!
//! This is the main entry point for the Keel command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use keel_core::RegistriesConfigLoader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RegistriesConfigLoader::new().and_then(|loader| loader.load(cli.config.as_deref()));

    // The configuration may ask for debug output, so tracing waits for it
    let debug = config.as_ref().is_ok_and(|c| c.debug);
    init_tracing(cli.verbose, cli.quiet, debug);

    let config = config.context("Failed to load registries configuration")?;
    if let Some(source) = &config.source {
        tracing::debug!("Registries configuration loaded from {}", source);
    }

    match cli.command {
        Commands::Extension(cmd) => commands::extension::run(cmd, &config),
        Commands::Platform(cmd) => commands::platform::run(cmd, &config),
        Commands::Registry(cmd) => commands::registry::run(cmd, &config),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool, debug: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 if debug => EnvFilter::new("debug"),
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
