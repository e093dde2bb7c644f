//! Catalog merging
//!
//! Extension catalogs are merged in the order given: the first catalog to
//! provide a category, an extension or a metadata key wins, later ones only
//! fill gaps. Callers control precedence by ordering the input.

use crate::error::{RegistryError, Result};
use indexmap::map::Entry;
use indexmap::IndexMap;
use keel_core::types::{
    ArtifactKey, Category, CatalogMetadata, Extension, ExtensionCatalog, ExtensionOrigin,
    MergeAbsent, Platform, PlatformCatalog,
};
use std::collections::HashSet;
use tracing::debug;

/// Merge extension catalogs into one
///
/// Catalogs referenced from another catalog's `derived-from` list are
/// already represented by it and are skipped. With a single remaining root
/// that root is returned as is.
pub fn merge_catalogs(catalogs: Vec<ExtensionCatalog>) -> Result<ExtensionCatalog> {
    if catalogs.len() <= 1 {
        return catalogs.into_iter().next().ok_or(RegistryError::EmptyMerge);
    }

    let mut roots = detect_roots(catalogs);
    if roots.len() == 1 {
        return roots.pop().ok_or(RegistryError::EmptyMerge);
    }
    debug!("Merging {} root catalogs", roots.len());

    let mut bom = None;
    let mut quarkus_core_version: Option<String> = None;
    let mut upstream_quarkus_core_version: Option<String> = None;
    let mut categories: IndexMap<String, Category> = IndexMap::new();
    let mut derived_from: IndexMap<String, ExtensionOrigin> = IndexMap::new();
    let mut extensions: IndexMap<ArtifactKey, Extension> = IndexMap::new();
    let mut metadata = CatalogMetadata::default();

    for root in &roots {
        if bom.is_none() {
            bom.clone_from(&root.bom);
        }
        if quarkus_core_version.is_none() {
            quarkus_core_version.clone_from(&root.quarkus_core_version);
        }
        if upstream_quarkus_core_version.is_none() {
            upstream_quarkus_core_version.clone_from(&root.upstream_quarkus_core_version);
        }

        for category in &root.categories {
            categories
                .entry(category.id.clone())
                .or_insert_with(|| category.clone());
        }
        for origin in &root.derived_from {
            derived_from
                .entry(origin.id.clone())
                .or_insert_with(|| origin.clone());
        }
        for extension in &root.extensions {
            match extensions.entry(extension.key()) {
                Entry::Occupied(mut entry) => entry.get_mut().add_origins(&extension.origins),
                Entry::Vacant(entry) => {
                    entry.insert(extension.clone());
                }
            }
        }
        metadata.merge_absent(&root.metadata);
    }

    if upstream_quarkus_core_version == quarkus_core_version {
        upstream_quarkus_core_version = None;
    }

    let id = roots
        .iter()
        .map(|c| c.id.as_str())
        .collect::<Vec<_>>()
        .join("+");
    let platform = roots.iter().all(|c| c.platform);

    let mut merged = ExtensionCatalog::new(id, platform);
    merged.bom = bom;
    merged.quarkus_core_version = quarkus_core_version;
    merged.upstream_quarkus_core_version = upstream_quarkus_core_version;
    merged.derived_from = derived_from.into_values().collect();
    merged.categories = categories.into_values().collect();
    merged.extensions = extensions.into_values().collect();
    merged.metadata = metadata;
    Ok(merged)
}

/// Catalogs no other catalog derives from, in input order
///
/// If every catalog is referenced (a cycle), all of them are kept.
fn detect_roots(catalogs: Vec<ExtensionCatalog>) -> Vec<ExtensionCatalog> {
    let referenced: HashSet<String> = catalogs
        .iter()
        .flat_map(|c| c.derived_from.iter().map(|o| o.id.clone()))
        .collect();
    if catalogs.iter().all(|c| referenced.contains(&c.id)) {
        return catalogs;
    }
    catalogs
        .into_iter()
        .filter(|c| !referenced.contains(&c.id))
        .collect()
}

/// Merge platform catalogs by platform key, stream id and release version
///
/// Releases already present (same version) are kept as they are; metadata
/// of streams, platforms and catalogs is merged put-if-absent.
pub fn merge_platform_catalogs(catalogs: Vec<PlatformCatalog>) -> Result<PlatformCatalog> {
    let mut iter = catalogs.into_iter();
    let mut merged = iter.next().ok_or(RegistryError::EmptyMerge)?;

    for catalog in iter {
        for platform in catalog.platforms {
            match merged.platform_mut(&platform.platform_key) {
                Some(existing) => merge_platform(existing, platform),
                None => merged.platforms.push(platform),
            }
        }
        merged.metadata.merge_absent(&catalog.metadata);
    }

    Ok(merged)
}

fn merge_platform(existing: &mut Platform, incoming: Platform) {
    if existing.name.is_none() {
        existing.name = incoming.name;
    }
    for stream in incoming.streams {
        match existing.stream_mut(&stream.id) {
            Some(current) => {
                for release in stream.releases {
                    if current.release(&release.version).is_none() {
                        current.releases.push(release);
                    }
                }
                if current.name.is_none() {
                    current.name = stream.name;
                }
                current.metadata.merge_absent(&stream.metadata);
            }
            None => existing.streams.push(stream),
        }
    }
    existing.metadata.merge_absent(&incoming.metadata);
}
