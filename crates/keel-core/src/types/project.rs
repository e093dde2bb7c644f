//! Project manifest (keel-project.yaml)

use super::coords::{ArtifactCoords, ArtifactKey};
use crate::error::{Error, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;

/// Default project manifest file name
pub const PROJECT_FILE_NAME: &str = "keel-project.yaml";

/// Extensions and platforms a project uses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarkus_core_version: Option<String>,

    /// Platform BOMs imported by the project, most preferred first
    #[serde(default)]
    pub platform_boms: Vec<ArtifactCoords>,

    #[serde(default)]
    pub extensions: Vec<ArtifactKey>,
}

impl ProjectManifest {
    /// Load a manifest; a missing file yields an empty project
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn has_extension(&self, key: &ArtifactKey) -> bool {
        self.extensions.contains(key)
    }

    /// Add an extension key; returns false if it was already present
    pub fn add_extension(&mut self, key: ArtifactKey) -> bool {
        if self.has_extension(&key) {
            return false;
        }
        self.extensions.push(key);
        true
    }

    /// Remove an extension key; returns false if it was not present
    pub fn remove_extension(&mut self, key: &ArtifactKey) -> bool {
        let before = self.extensions.len();
        self.extensions.retain(|k| k != key);
        before != self.extensions.len()
    }
}
