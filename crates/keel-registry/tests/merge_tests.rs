//! Catalog merge tests

mod common;

use common::*;
use keel_core::types::{ExtensionCatalog, PlatformCatalog};
use keel_registry::{merge_catalogs, merge_platform_catalogs, RegistryError};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_single_catalog_is_returned_unchanged() {
    let catalog = CatalogBuilder::member(&bom("io.acme", "acme-bom", "1.0"))
        .core("2.7.1")
        .extension("acme-rest")
        .build();
    assert_eq!(merge_catalogs(vec![catalog.clone()]).unwrap(), catalog);
}

#[test]
fn test_derived_catalog_is_the_only_root() {
    let base = CatalogBuilder::member(&bom("io.acme", "base-bom", "1.0"))
        .extension("base-ext")
        .build();
    let derived = CatalogBuilder::member(&bom("io.acme", "derived-bom", "1.0"))
        .derived_from(&base)
        .extension("derived-ext")
        .build();

    let merged = merge_catalogs(vec![derived.clone(), base]).unwrap();
    assert_eq!(merged, derived);
}

#[test]
fn test_single_root_shortcut_matches_full_merge() {
    let root = CatalogBuilder::member(&bom("io.acme", "root-bom", "1.0"))
        .core("2.7.1")
        .upstream("2.7.0")
        .category("web", "Web")
        .extension("a")
        .extension("b")
        .metadata("project", json!({"properties": {"maven-plugin-version": "2.7.1"}}))
        .build();
    let shortcut = merge_catalogs(vec![root.clone()]).unwrap();

    // Same root walked through the full merge next to an empty catalog
    let empty = ExtensionCatalog::new("empty", true);
    let full = merge_catalogs(vec![root.clone(), empty]).unwrap();

    assert_eq!(full.bom, shortcut.bom);
    assert_eq!(full.quarkus_core_version, shortcut.quarkus_core_version);
    assert_eq!(
        full.upstream_quarkus_core_version,
        shortcut.upstream_quarkus_core_version
    );
    assert_eq!(full.categories, shortcut.categories);
    assert_eq!(full.derived_from, shortcut.derived_from);
    assert_eq!(full.extensions, shortcut.extensions);
    assert_eq!(full.metadata, shortcut.metadata);
    assert_eq!(full.platform, shortcut.platform);
}

#[test]
fn test_same_key_keeps_first_extension_and_unions_origins() {
    let first = CatalogBuilder::member(&bom("io.acme", "first-bom", "1.0"))
        .extension_version("shared", "1.0")
        .extension("first-only")
        .build();
    let second = CatalogBuilder::member(&bom("io.acme", "second-bom", "2.0"))
        .extension_version("shared", "2.0")
        .extension("second-only")
        .build();

    let merged = merge_catalogs(vec![first.clone(), second.clone()]).unwrap();

    assert_eq!(
        extension_ids(&merged),
        vec!["shared", "first-only", "second-only"]
    );
    assert_extension_version(&merged, "shared", "1.0");
    let origins: Vec<_> = extension(&merged, "shared")
        .origins
        .iter()
        .map(|o| o.id.clone())
        .collect();
    assert_eq!(origins, vec![first.id.clone(), second.id.clone()]);
    assert_eq!(merged.id, format!("{}+{}", first.id, second.id));
    assert_eq!(merged.bom, first.bom);
}

#[test]
fn test_categories_first_write_wins() {
    let a = CatalogBuilder::community("a").category("web", "Web").build();
    let b = CatalogBuilder::community("b")
        .category("web", "Something else")
        .category("data", "Data")
        .build();

    let merged = merge_catalogs(vec![a, b]).unwrap();
    let names: Vec<_> = merged.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Web", "Data"]);
}

#[test]
fn test_metadata_put_if_absent_is_recursive() {
    let a = CatalogBuilder::community("a")
        .metadata("project", json!({"properties": {"doc-root": "a"}}))
        .metadata("maven", json!("a"))
        .build();
    let b = CatalogBuilder::community("b")
        .metadata(
            "project",
            json!({"properties": {"doc-root": "b", "plugin": "b"}, "codestarts-artifacts": ["x"]}),
        )
        .metadata("maven", json!({"nested": true}))
        .metadata("gradle", json!("b"))
        .build();

    let merged = merge_catalogs(vec![a, b]).unwrap();
    let project = merged.metadata.project.expect("typed project section");
    assert_eq!(project.properties["doc-root"], "a");
    assert_eq!(project.properties["plugin"], "b");
    assert_eq!(project.codestarts_artifacts, vec!["x"]);
    assert_eq!(merged.metadata.other["maven"], json!("a"));
    assert_eq!(merged.metadata.other["gradle"], json!("b"));
}

#[test]
fn test_core_versions_first_seen() {
    let a = CatalogBuilder::community("a").build();
    let b = CatalogBuilder::community("b").core("2.7.1").upstream("2.7.0").build();
    let c = CatalogBuilder::community("c").core("3.0.0").build();

    let merged = merge_catalogs(vec![a, b, c]).unwrap();
    assert_eq!(merged.quarkus_core_version.as_deref(), Some("2.7.1"));
    assert_eq!(merged.upstream_quarkus_core_version.as_deref(), Some("2.7.0"));
}

#[test]
fn test_empty_input_is_rejected() {
    assert!(matches!(merge_catalogs(vec![]), Err(RegistryError::EmptyMerge)));
}

#[test]
fn test_platform_merge_never_duplicates_releases() {
    let core = bom("io.quarkus.platform", "quarkus-bom", "2.7.1");
    let camel = bom("io.quarkus.platform", "quarkus-camel-bom", "2.7.1");
    let first = platform_catalog(vec![platform(
        "io.quarkus.platform",
        vec![stream(
            "2.7",
            vec![
                release("2.7.1", "2.7.1.Final", None, &[&core]),
                release("2.7.0", "2.7.0.Final", None, &[&core]),
            ],
        )],
    )]);
    let second = platform_catalog(vec![
        platform(
            "io.quarkus.platform",
            vec![
                stream(
                    "2.7",
                    vec![
                        release("2.7.1", "2.7.1.Final", None, &[&core, &camel]),
                        release("2.7.2", "2.7.2.Final", None, &[&core]),
                    ],
                ),
                stream("2.6", vec![release("2.6.3", "2.6.3.Final", None, &[&core])]),
            ],
        ),
        platform("org.acme.platform", vec![]),
    ]);

    let merged = merge_platform_catalogs(vec![first, second]).unwrap();

    let keys: Vec<_> = merged.platforms.iter().map(|p| p.platform_key.as_str()).collect();
    assert_eq!(keys, vec!["io.quarkus.platform", "org.acme.platform"]);

    let quarkus = merged.platform("io.quarkus.platform").unwrap();
    let streams: Vec<_> = quarkus.streams.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(streams, vec!["2.7", "2.6"]);

    let versions: Vec<_> = quarkus.streams[0]
        .releases
        .iter()
        .map(|r| r.version.as_str())
        .collect();
    assert_eq!(versions, vec!["2.7.1", "2.7.0", "2.7.2"]);
    // the release already present is kept as first seen
    assert_eq!(quarkus.streams[0].releases[0].member_boms, vec![core]);
}

#[test]
fn test_platform_merge_stream_metadata_put_if_absent() {
    let mut first = platform_catalog(vec![platform("p", vec![stream("1", vec![])])]);
    first.platforms[0].streams[0]
        .metadata
        .insert("lts".into(), json!(true));
    let mut second = first.clone();
    second.platforms[0].streams[0]
        .metadata
        .insert("lts".into(), json!(false));
    second.platforms[0].streams[0]
        .metadata
        .insert("eol".into(), json!("2025-01"));
    second.metadata.insert("registry".into(), json!("second"));

    let merged = merge_platform_catalogs(vec![first, second]).unwrap();
    let metadata = &merged.platforms[0].streams[0].metadata;
    assert_eq!(metadata["lts"], json!(true));
    assert_eq!(metadata["eol"], json!("2025-01"));
    assert_eq!(merged.metadata["registry"], json!("second"));
}

#[test]
fn test_platform_merge_single_input_unchanged() {
    let catalog = PlatformCatalog::new(vec![platform("p", vec![])]);
    assert_eq!(
        merge_platform_catalogs(vec![catalog.clone()]).unwrap(),
        catalog
    );
}
