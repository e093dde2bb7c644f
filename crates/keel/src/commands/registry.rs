//! Registry commands

use anyhow::{bail, Context, Result};
use keel_core::{RegistriesConfig, RegistryConfig};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{RegistryCommands, RegistryListArgs};
use crate::commands::build_resolver;
use crate::output;

pub fn run(cmd: RegistryCommands, config: &RegistriesConfig) -> Result<()> {
    match cmd {
        RegistryCommands::List(args) => list(args, config),
        RegistryCommands::ClearCache => clear_cache(config),
    }
}

#[derive(Debug, Tabled, Serialize)]
struct RegistryRow {
    id: String,
    enabled: bool,
    repository: String,
    #[tabled(rename = "quarkus versions")]
    quarkus_versions: String,
    offering: String,
}

impl From<&RegistryConfig> for RegistryRow {
    fn from(registry: &RegistryConfig) -> Self {
        let quarkus_versions = registry
            .quarkus_versions
            .as_ref()
            .and_then(|v| {
                v.recognized_versions_expression.as_ref().map(|e| {
                    if v.exclusive_provider {
                        format!("{} (exclusive)", e)
                    } else {
                        e.clone()
                    }
                })
            })
            .unwrap_or_else(|| "*".to_string());
        Self {
            id: registry.id.clone(),
            enabled: registry.enabled,
            repository: registry.repository_url(),
            quarkus_versions,
            offering: registry.offering.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

fn list(args: RegistryListArgs, config: &RegistriesConfig) -> Result<()> {
    let rows: Vec<RegistryRow> = config.registries.iter().map(RegistryRow::from).collect();

    if args.json {
        let json =
            serde_json::to_string_pretty(&rows).context("Failed to serialize registries to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    match &config.source {
        Some(source) => output::info(&format!("Registries from {}", source)),
        None => output::info("Default registries (no configuration file)"),
    }
    if rows.is_empty() {
        output::warning("No registries configured");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }
    Ok(())
}

/// Drop every registry's cached descriptors, reporting the registries that failed
fn clear_cache(config: &RegistriesConfig) -> Result<()> {
    let resolver = build_resolver(config)?;
    let failed = resolver.clear_registry_cache();
    let cleared = resolver.registries().len() - failed.len();

    if failed.is_empty() {
        output::success(&format!("Cleared cache of {} registries", cleared));
        return Ok(());
    }
    bail!(
        "Failed to clear the cache of registries: {}",
        failed.join(", ")
    )
}
