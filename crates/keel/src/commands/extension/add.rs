//! Extension add command

use anyhow::{Context, Result};
use keel_core::types::{Extension, ExtensionCatalog, ProjectManifest};
use keel_core::RegistriesConfig;

use super::common::{load_project, resolve_project_catalog, select_one};
use crate::cli::ExtensionAddArgs;
use crate::commands::build_resolver;
use crate::output;

/// What adding one extension changed in the manifest
#[derive(Debug, PartialEq)]
enum Added {
    Extension { key: String, bom: Option<String> },
    AlreadyPresent(String),
}

/// Record `extension` in the manifest, importing the platform BOM it comes from
fn add_to_manifest(
    manifest: &mut ProjectManifest,
    catalog: &ExtensionCatalog,
    extension: &Extension,
) -> Added {
    let key = extension.key();
    if !manifest.add_extension(key.clone()) {
        return Added::AlreadyPresent(key.to_string());
    }

    let bom = extension
        .preferred_origin()
        .filter(|o| o.platform)
        .and_then(|o| o.bom.clone())
        .filter(|bom| !manifest.platform_boms.iter().any(|b| b.key() == bom.key()));
    let bom = bom.map(|bom| {
        let name = bom.to_string();
        manifest.platform_boms.push(bom);
        name
    });

    if manifest.quarkus_core_version.is_none() {
        manifest
            .quarkus_core_version
            .clone_from(&catalog.quarkus_core_version);
    }

    Added::Extension {
        key: key.to_string(),
        bom,
    }
}

/// Add extensions to the project manifest
///
/// Every pattern must select exactly one extension; nothing is written otherwise.
///
/// Supports:
/// - By key: `keel extension add io.quarkus:quarkus-rest`
/// - By artifactId or name: `keel extension add quarkus-rest`
/// - By glob: `keel extension add '*kafka-client'`
pub(super) fn run(args: ExtensionAddArgs, config: &RegistriesConfig) -> Result<()> {
    let (path, mut manifest) = load_project(&args.project.project)?;
    let resolver = build_resolver(config)?;
    let catalog = resolve_project_catalog(&resolver, &manifest, args.project.stream.as_deref())?;

    let selected = args
        .patterns
        .iter()
        .map(|p| select_one(p, &catalog.extensions))
        .collect::<Result<Vec<_>>>()?;

    let mut changed = false;
    for extension in selected {
        match add_to_manifest(&mut manifest, &catalog, extension) {
            Added::Extension { key, bom } => {
                changed = true;
                output::success(&format!("Added extension {}", key));
                if let Some(bom) = bom {
                    output::kv("imported platform", &bom);
                }
            }
            Added::AlreadyPresent(key) => {
                output::info(&format!("Extension {} is already part of the project", key))
            }
        }
    }

    if changed {
        manifest
            .save(&path)
            .with_context(|| format!("Failed to write {}", path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::types::{ArtifactCoords, OriginPreference};
    use pretty_assertions::assert_eq;

    fn ranked_catalog(bom: &ArtifactCoords, platform: bool) -> ExtensionCatalog {
        let mut catalog = ExtensionCatalog::new(bom.catalog_artifact().to_string(), platform);
        catalog.bom = Some(bom.clone());
        catalog.quarkus_core_version = Some("3.2.0".to_string());
        let mut extension = Extension::new(
            ArtifactCoords::jar("io.quarkus", "quarkus-rest", "3.2.0"),
            "REST",
        );
        extension.origins.push(catalog.as_origin());
        catalog.extensions.push(extension);
        catalog.set_origin_preference(OriginPreference::new(0, 1, 1, 1, 0));
        catalog
    }

    #[test]
    fn test_add_imports_platform_bom() {
        let bom = ArtifactCoords::pom("io.quarkus.platform", "quarkus-bom", "3.2.0");
        let catalog = ranked_catalog(&bom, true);
        let mut manifest = ProjectManifest::default();

        let added = add_to_manifest(&mut manifest, &catalog, &catalog.extensions[0]);
        assert_eq!(
            added,
            Added::Extension {
                key: "io.quarkus:quarkus-rest".to_string(),
                bom: Some(bom.to_string()),
            }
        );
        assert_eq!(manifest.platform_boms, vec![bom]);
        assert_eq!(manifest.quarkus_core_version.as_deref(), Some("3.2.0"));

        let again = add_to_manifest(&mut manifest, &catalog, &catalog.extensions[0]);
        assert_eq!(again, Added::AlreadyPresent("io.quarkus:quarkus-rest".to_string()));
        assert_eq!(manifest.platform_boms.len(), 1);
    }

    #[test]
    fn test_add_from_community_catalog_keeps_boms() {
        let bom = ArtifactCoords::pom("io.acme", "acme-extensions", "1.0");
        let catalog = ranked_catalog(&bom, false);
        let mut manifest = ProjectManifest::default();

        let added = add_to_manifest(&mut manifest, &catalog, &catalog.extensions[0]);
        assert!(matches!(added, Added::Extension { bom: None, .. }));
        assert!(manifest.platform_boms.is_empty());
    }
}
