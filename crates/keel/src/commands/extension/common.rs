//! Shared helpers for extension subcommands

use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use keel_core::types::{Extension, ExtensionCatalog, ProjectManifest, StreamCoords, PROJECT_FILE_NAME};
use keel_registry::{select, ExtensionCatalogResolver, Selection};

use crate::output;

/// Manifest path and contents of the project in `dir`
pub(super) fn load_project(dir: &Utf8Path) -> Result<(Utf8PathBuf, ProjectManifest)> {
    let path = dir.join(PROJECT_FILE_NAME);
    let manifest = ProjectManifest::load(&path)
        .with_context(|| format!("Failed to load project manifest {}", path))?;
    Ok((path, manifest))
}

/// Catalog of the extensions available to a project
///
/// An explicit stream wins; otherwise the project's platform BOMs, then its
/// quarkus-core version, and finally everything the registries offer.
pub(super) fn resolve_project_catalog(
    resolver: &ExtensionCatalogResolver,
    manifest: &ProjectManifest,
    stream: Option<&str>,
) -> Result<ExtensionCatalog> {
    let pb = output::spinner("Resolving extension catalog...");
    let catalog = if let Some(stream) = stream {
        let coords: StreamCoords = stream
            .parse()
            .with_context(|| format!("Invalid platform stream '{}'", stream))?;
        resolver.resolve_extension_catalog_for_stream(&coords)
    } else if !manifest.platform_boms.is_empty() {
        resolver.resolve_extension_catalog_for_platforms(&manifest.platform_boms)
    } else if let Some(version) = &manifest.quarkus_core_version {
        resolver.resolve_extension_catalog_for_version(version)
    } else {
        resolver.resolve_extension_catalog()
    };
    pb.finish_and_clear();

    let catalog = catalog.context("Failed to resolve extension catalog")?;
    tracing::debug!(
        "Resolved catalog {} with {} extensions",
        catalog.id,
        catalog.extensions.len()
    );
    Ok(catalog)
}

/// The single extension `pattern` designates
pub(super) fn select_one<'a>(pattern: &str, extensions: &'a [Extension]) -> Result<&'a Extension> {
    match select(pattern, extensions)? {
        Selection::Selected(extension) => Ok(extension),
        Selection::NotFound => bail!("No extension found matching pattern '{}'", pattern),
        Selection::Ambiguous(matches) => {
            let keys: Vec<String> = matches.iter().map(|e| e.key().to_string()).collect();
            bail!(
                "Multiple extensions matching '{}', be more specific: {}",
                pattern,
                keys.join(", ")
            )
        }
    }
}
