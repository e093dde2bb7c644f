//! Extension remove command

use anyhow::{Context, Result};
use keel_core::types::{ArtifactCoords, ArtifactKey, Extension, ProjectManifest};

use super::common::{load_project, select_one};
use crate::cli::ExtensionRemoveArgs;
use crate::output;

/// The project's extensions in a form the selection rules accept
fn project_extensions(manifest: &ProjectManifest) -> Vec<Extension> {
    manifest
        .extensions
        .iter()
        .map(|key| {
            let coords = ArtifactCoords::new(
                key.group_id.clone(),
                key.artifact_id.clone(),
                key.classifier.clone(),
                key.r#type.clone(),
                "",
            );
            Extension::new(coords, key.artifact_id.clone())
        })
        .collect()
}

/// Keys of the project extensions selected by `patterns`
fn selected_keys(manifest: &ProjectManifest, patterns: &[String]) -> Result<Vec<ArtifactKey>> {
    let extensions = project_extensions(manifest);
    patterns
        .iter()
        .map(|p| select_one(p, &extensions).map(Extension::key))
        .collect()
}

/// Remove extensions from the project manifest
///
/// Patterns are matched against the project's own extensions only, so no
/// registry is contacted.
pub(super) fn run(args: ExtensionRemoveArgs) -> Result<()> {
    let (path, mut manifest) = load_project(&args.project)?;
    let keys = selected_keys(&manifest, &args.patterns)?;

    for key in &keys {
        if manifest.remove_extension(key) {
            output::success(&format!("Removed extension {}", key));
        }
    }
    manifest
        .save(&path)
        .with_context(|| format!("Failed to write {}", path))?;
    Ok(())
}
