//! Assertion helpers for merged catalogs

#![allow(dead_code)]

use super::builders::EXTENSION_GROUP;
use keel_core::types::{ArtifactKey, Extension, ExtensionCatalog, OriginPreference};

pub fn extension<'a>(catalog: &'a ExtensionCatalog, artifact_id: &str) -> &'a Extension {
    catalog
        .extension(&ArtifactKey::new(EXTENSION_GROUP, artifact_id))
        .unwrap_or_else(|| panic!("extension {} missing from {}", artifact_id, catalog.id))
}

/// Artifact ids of the catalog's extensions, in catalog order
pub fn extension_ids(catalog: &ExtensionCatalog) -> Vec<String> {
    catalog
        .extensions
        .iter()
        .map(|e| e.artifact.artifact_id.clone())
        .collect()
}

/// Assert the version the merged catalog kept for an extension
pub fn assert_extension_version(catalog: &ExtensionCatalog, artifact_id: &str, version: &str) {
    assert_eq!(
        extension(catalog, artifact_id).artifact.version,
        version,
        "unexpected version of {}",
        artifact_id
    );
}

/// Assert the preference of an extension's preferred origin
pub fn assert_preferred(catalog: &ExtensionCatalog, artifact_id: &str, expected: OriginPreference) {
    let origin = extension(catalog, artifact_id)
        .preferred_origin()
        .unwrap_or_else(|| panic!("extension {} has no ranked origin", artifact_id));
    assert_eq!(
        origin.preference(),
        Some(expected),
        "unexpected preferred origin of {}: {}",
        artifact_id,
        origin.id
    );
}

/// Assert an extension is only provided by platform catalogs
pub fn assert_platform_only(catalog: &ExtensionCatalog, artifact_id: &str) {
    let ext = extension(catalog, artifact_id);
    let first = ext
        .origins
        .first()
        .unwrap_or_else(|| panic!("extension {} has no origins", artifact_id));
    assert!(first.platform, "{} first provided by {}", artifact_id, first.id);
}
