//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Keel - Extension catalogs from multiple registries
#[derive(Parser, Debug)]
#[command(name = "keel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the registries config file (default: $KEEL_CONFIG or ~/.keel/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project extension management
    #[command(subcommand)]
    Extension(ExtensionCommands),

    /// Platforms offered by the registries
    #[command(subcommand)]
    Platform(PlatformCommands),

    /// Configured registries
    #[command(subcommand)]
    Registry(RegistryCommands),
}

/// Where the project manifest lives and which catalog it is resolved against
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project directory containing keel-project.yaml
    #[arg(short, long, default_value = ".")]
    pub project: Utf8PathBuf,

    /// Resolve against a platform stream (platformKey:streamId or streamId)
    #[arg(short = 'S', long)]
    pub stream: Option<String>,
}

// Extension commands
#[derive(Subcommand, Debug)]
pub enum ExtensionCommands {
    /// List extensions available to the project
    List(ExtensionListArgs),

    /// Add extensions to the project
    Add(ExtensionAddArgs),

    /// Remove extensions from the project
    Remove(ExtensionRemoveArgs),
}

#[derive(Args, Debug)]
pub struct ExtensionListArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Only list extensions matching this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Show extensions already added to the project only
    #[arg(long)]
    pub installed: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExtensionAddArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Extensions to add: groupId:artifactId, artifactId, name, or glob
    #[arg(required = true)]
    pub patterns: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ExtensionRemoveArgs {
    /// Project directory containing keel-project.yaml
    #[arg(short, long, default_value = ".")]
    pub project: Utf8PathBuf,

    /// Extensions to remove: groupId:artifactId, artifactId, or glob
    #[arg(required = true)]
    pub patterns: Vec<String>,
}

// Platform commands
#[derive(Subcommand, Debug)]
pub enum PlatformCommands {
    /// List platforms, streams and their recommended releases
    List(PlatformListArgs),
}

#[derive(Args, Debug)]
pub struct PlatformListArgs {
    /// Platforms compatible with this quarkus-core version
    #[arg(long)]
    pub quarkus_version: Option<String>,

    /// Only ask this registry
    #[arg(short, long)]
    pub registry: Option<String>,

    /// Show every release of every stream
    #[arg(short, long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Registry commands
#[derive(Subcommand, Debug)]
pub enum RegistryCommands {
    /// List configured registries
    List(RegistryListArgs),

    /// Drop cached registry descriptors
    ClearCache,
}

#[derive(Args, Debug)]
pub struct RegistryListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
