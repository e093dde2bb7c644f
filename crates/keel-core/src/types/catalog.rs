//! Extension catalog types

use super::coords::{ArtifactCoords, ArtifactKey};
use super::metadata::{CatalogMetadata, ExtensionMetadata};
use super::origin::{CatalogOrigin, ExtensionOrigin, OriginPreference};
use serde::{Deserialize, Serialize};

/// A named collection of extensions provided by a platform member BOM or a
/// registry's non-platform offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionCatalog {
    pub id: String,

    #[serde(default)]
    pub platform: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bom: Option<ArtifactCoords>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarkus_core_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_quarkus_core_version: Option<String>,

    /// Catalogs this one was derived from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derived_from: Vec<ExtensionOrigin>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub extensions: Vec<Extension>,

    #[serde(default, skip_serializing_if = "CatalogMetadata::is_empty")]
    pub metadata: CatalogMetadata,

    /// Ranking assigned by the resolver; never part of a descriptor
    #[serde(skip)]
    pub resolution: Option<CatalogOrigin>,
}

impl ExtensionCatalog {
    /// Create an empty catalog
    pub fn new(id: impl Into<String>, platform: bool) -> Self {
        Self {
            id: id.into(),
            platform,
            bom: None,
            quarkus_core_version: None,
            upstream_quarkus_core_version: None,
            derived_from: Vec::new(),
            categories: Vec::new(),
            extensions: Vec::new(),
            metadata: CatalogMetadata::default(),
            resolution: None,
        }
    }

    /// Origin reference other catalogs and extensions use to point at this one
    pub fn as_origin(&self) -> ExtensionOrigin {
        ExtensionOrigin {
            id: self.id.clone(),
            bom: self.bom.clone(),
            platform: self.platform,
            resolution: self.resolution,
        }
    }

    /// Rank this catalog and every extension origin that refers to it
    pub fn set_origin_preference(&mut self, preference: OriginPreference) {
        let resolution = if self.platform {
            CatalogOrigin::Platform { preference }
        } else {
            CatalogOrigin::Community { preference }
        };
        self.resolution = Some(resolution);

        for extension in &mut self.extensions {
            for origin in extension.origins.iter_mut().filter(|o| o.id == self.id) {
                origin.resolution = Some(resolution);
            }
        }
    }

    pub fn origin_preference(&self) -> Option<OriginPreference> {
        self.resolution.map(|r| r.preference())
    }

    /// Look up an extension by key
    pub fn extension(&self, key: &ArtifactKey) -> Option<&Extension> {
        self.extensions.iter().find(|e| &e.artifact.key() == key)
    }

    /// Keep only the extensions matching `keep`
    pub fn retain_extensions(&mut self, keep: impl FnMut(&Extension) -> bool) {
        self.extensions.retain(keep);
    }
}

/// An installable unit of functionality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Extension {
    pub artifact: ArtifactCoords,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Catalogs providing this extension
    #[serde(default)]
    pub origins: Vec<ExtensionOrigin>,

    #[serde(default)]
    pub metadata: ExtensionMetadata,
}

impl Extension {
    pub fn new(artifact: ArtifactCoords, name: impl Into<String>) -> Self {
        Self {
            artifact,
            name: name.into(),
            description: None,
            origins: Vec::new(),
            metadata: ExtensionMetadata::default(),
        }
    }

    pub fn key(&self) -> ArtifactKey {
        self.artifact.key()
    }

    /// Add origins not already referenced (by id), keeping order
    pub fn add_origins<'a>(&mut self, origins: impl IntoIterator<Item = &'a ExtensionOrigin>) {
        for origin in origins {
            if !self.origins.iter().any(|o| o.id == origin.id) {
                self.origins.push(origin.clone());
            }
        }
    }

    /// Most preferred ranked origin
    ///
    /// Platform origins outrank community ones; within each kind the lowest
    /// preference wins.
    pub fn preferred_origin(&self) -> Option<&ExtensionOrigin> {
        self.origins
            .iter()
            .filter_map(|o| o.resolution.map(|r| (o, r)))
            .min_by_key(|(_, r)| (!r.is_platform(), r.preference()))
            .map(|(o, _)| o)
    }

    /// Whether any platform provides this extension
    pub fn is_platform_provided(&self) -> bool {
        self.origins.iter().any(|o| o.platform)
    }
}

/// Extension category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Category {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
