//! Platform listing command

use anyhow::{Context, Result};
use keel_core::types::PlatformCatalog;
use keel_core::RegistriesConfig;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{PlatformCommands, PlatformListArgs};
use crate::commands::build_resolver;
use crate::output;

pub fn run(cmd: PlatformCommands, config: &RegistriesConfig) -> Result<()> {
    match cmd {
        PlatformCommands::List(args) => list(args, config),
    }
}

#[derive(Debug, Tabled, Serialize)]
struct ReleaseRow {
    platform: String,
    stream: String,
    release: String,
    #[tabled(rename = "quarkus core")]
    quarkus_core: String,
    #[tabled(rename = "member boms")]
    members: usize,
}

/// One row per stream (its recommended release), or per release with `all`
fn release_rows(catalog: &PlatformCatalog, all: bool) -> Vec<ReleaseRow> {
    let mut rows = Vec::new();
    for platform in &catalog.platforms {
        for stream in &platform.streams {
            let releases: Vec<_> = if all {
                stream.releases.iter().collect()
            } else {
                stream.recommended_release().into_iter().collect()
            };
            for release in releases {
                rows.push(ReleaseRow {
                    platform: platform.platform_key.clone(),
                    stream: stream.id.clone(),
                    release: release.version.clone(),
                    quarkus_core: release.quarkus_core_version.clone(),
                    members: release.member_boms.len(),
                });
            }
        }
    }
    rows
}

/// List platforms offered by the registries
///
/// Supports:
/// - Recommended releases: `keel platform list`
/// - Every release: `keel platform list --all`
/// - One registry: `keel platform list --registry registry.quarkus.io`
/// - For a core version: `keel platform list --quarkus-version 3.2.0`
fn list(args: PlatformListArgs, config: &RegistriesConfig) -> Result<()> {
    let resolver = build_resolver(config)?;
    let version = args.quarkus_version.as_deref();

    let pb = output::spinner("Resolving platforms...");
    let catalog = match &args.registry {
        Some(id) => resolver.resolve_platform_catalog_from_registry(id, version),
        None => resolver.resolve_platform_catalog(version),
    };
    pb.finish_and_clear();
    let catalog = catalog.context("Failed to resolve platform catalog")?;

    let Some(catalog) = catalog else {
        output::warning("None of the registries provided any platform");
        return Ok(());
    };

    if args.json {
        let json = serde_json::to_string_pretty(&catalog)
            .context("Failed to serialize platforms to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    let rows = release_rows(&catalog, args.all);
    if rows.is_empty() {
        output::warning("No platform releases found");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }
    Ok(())
}
