//! Extension list command

use anyhow::{Context, Result};
use keel_core::types::{Extension, ProjectManifest};
use keel_core::RegistriesConfig;
use keel_registry::search;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Modify, Style, Width},
    Table, Tabled,
};

use super::common::{load_project, resolve_project_catalog};
use crate::cli::ExtensionListArgs;
use crate::commands::build_resolver;
use crate::output;

/// Row of the extension table
#[derive(Debug, Tabled, Serialize)]
struct ExtensionRow {
    key: String,
    name: String,
    version: String,
    origin: String,
    added: String,
}

impl ExtensionRow {
    fn new(extension: &Extension, manifest: &ProjectManifest) -> Self {
        let origin = extension
            .preferred_origin()
            .or_else(|| extension.origins.first())
            .map(|o| o.id.clone())
            .unwrap_or_else(|| "-".to_string());
        Self {
            key: extension.key().to_string(),
            name: extension.name.clone(),
            version: extension.artifact.version.clone(),
            origin,
            added: if manifest.has_extension(&extension.key()) {
                "✓".to_string()
            } else {
                String::new()
            },
        }
    }
}

fn rows(
    extensions: &[Extension],
    manifest: &ProjectManifest,
    query: Option<&str>,
    installed_only: bool,
) -> Vec<ExtensionRow> {
    search(query.unwrap_or(""), extensions)
        .into_iter()
        .filter(|e| !installed_only || manifest.has_extension(&e.key()))
        .map(|e| ExtensionRow::new(e, manifest))
        .collect()
}

/// List the extensions available to the project
///
/// Supports:
/// - Everything the project can add: `keel extension list`
/// - Text search: `keel extension list --search kafka`
/// - Added extensions only: `keel extension list --installed`
/// - A specific stream: `keel extension list --stream io.quarkus.platform:3.2`
pub(super) fn run(args: ExtensionListArgs, config: &RegistriesConfig) -> Result<()> {
    let (_, manifest) = load_project(&args.project.project)?;
    let resolver = build_resolver(config)?;
    let catalog = resolve_project_catalog(&resolver, &manifest, args.project.stream.as_deref())?;

    let rows = rows(
        &catalog.extensions,
        &manifest,
        args.search.as_deref(),
        args.installed,
    );

    if args.json {
        let json =
            serde_json::to_string_pretty(&rows).context("Failed to serialize extensions to JSON")?;
        println!("{}", json);
    } else if rows.is_empty() {
        output::warning("No extensions found matching criteria");
    } else {
        if let Some(version) = &catalog.quarkus_core_version {
            output::info(&format!("Extensions for quarkus-core {}", version));
        }
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        table.with(Modify::new(Columns::new(1..2)).with(Width::wrap(40).keep_words(true)));
        println!("{}", table);
    }

    Ok(())
}
