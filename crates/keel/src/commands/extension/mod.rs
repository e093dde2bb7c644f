//! Extension management commands
//!
//! Implements extension management CLI commands:
//! - list: List extensions the project can use
//! - add: Add extensions to the project manifest
//! - remove: Remove extensions from the project manifest

mod add;
mod common;
mod list;
mod remove;

use anyhow::Result;
use keel_core::RegistriesConfig;

use crate::cli::ExtensionCommands;

/// Main entry point for extension subcommands
pub fn run(cmd: ExtensionCommands, config: &RegistriesConfig) -> Result<()> {
    match cmd {
        ExtensionCommands::List(args) => list::run(args, config),
        ExtensionCommands::Add(args) => add::run(args, config),
        ExtensionCommands::Remove(args) => remove::run(args),
    }
}
