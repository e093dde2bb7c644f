//! Platform catalog hierarchy: catalog → platform → stream → release

use super::coords::ArtifactCoords;
use super::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// Platforms offered by a registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformCatalog {
    #[serde(default)]
    pub platforms: Vec<Platform>,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl PlatformCatalog {
    pub fn new(platforms: Vec<Platform>) -> Self {
        Self {
            platforms,
            metadata: Metadata::new(),
        }
    }

    pub fn platform(&self, platform_key: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.platform_key == platform_key)
    }

    pub fn platform_mut(&mut self, platform_key: &str) -> Option<&mut Platform> {
        self.platforms
            .iter_mut()
            .find(|p| p.platform_key == platform_key)
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

/// A platform identified by its key (usually the BOM groupId)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Platform {
    pub platform_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub streams: Vec<PlatformStream>,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Platform {
    pub fn new(platform_key: impl Into<String>) -> Self {
        Self {
            platform_key: platform_key.into(),
            name: None,
            streams: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn stream(&self, id: &str) -> Option<&PlatformStream> {
        self.streams.iter().find(|s| s.id == id)
    }

    pub fn stream_mut(&mut self, id: &str) -> Option<&mut PlatformStream> {
        self.streams.iter_mut().find(|s| s.id == id)
    }

    /// The first stream is the recommended one
    pub fn recommended_stream(&self) -> Option<&PlatformStream> {
        self.streams.first()
    }
}

/// A line of platform releases sharing a stream id (e.g. "2.7")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformStream {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Releases, most recommended first
    #[serde(default)]
    pub releases: Vec<PlatformRelease>,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl PlatformStream {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            releases: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn release(&self, version: &str) -> Option<&PlatformRelease> {
        self.releases.iter().find(|r| r.version == version)
    }

    pub fn recommended_release(&self) -> Option<&PlatformRelease> {
        self.releases.first()
    }
}

/// A platform release: a version plus the member BOMs it is made of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformRelease {
    pub version: String,

    pub quarkus_core_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_quarkus_core_version: Option<String>,

    #[serde(default)]
    pub member_boms: Vec<ArtifactCoords>,
}

impl PlatformRelease {
    pub fn new(version: impl Into<String>, quarkus_core_version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            quarkus_core_version: quarkus_core_version.into(),
            upstream_quarkus_core_version: None,
            member_boms: Vec::new(),
        }
    }
}
