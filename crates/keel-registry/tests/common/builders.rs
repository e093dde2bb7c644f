//! Catalog builders for creating test fixtures

#![allow(dead_code)]

use keel_core::types::{
    ArtifactCoords, Category, Extension, ExtensionCatalog, Platform, PlatformCatalog,
    PlatformRelease, PlatformReleaseInfo, PlatformStream,
};

/// Group of every extension built by [`CatalogBuilder`]
pub const EXTENSION_GROUP: &str = "io.acme";

/// Member BOM coordinates
pub fn bom(group_id: &str, artifact_id: &str, version: &str) -> ArtifactCoords {
    ArtifactCoords::pom(group_id, artifact_id, version)
}

/// Builder for creating ExtensionCatalog test fixtures
pub struct CatalogBuilder {
    catalog: ExtensionCatalog,
}

impl CatalogBuilder {
    /// Platform member catalog for `bom`, identified by its catalog coordinates
    pub fn member(bom: &ArtifactCoords) -> Self {
        let mut catalog = ExtensionCatalog::new(bom.catalog_artifact().to_string(), true);
        catalog.bom = Some(bom.clone());
        Self { catalog }
    }

    /// Non-platform catalog
    pub fn community(id: &str) -> Self {
        Self {
            catalog: ExtensionCatalog::new(id, false),
        }
    }

    pub fn core(mut self, version: &str) -> Self {
        self.catalog.quarkus_core_version = Some(version.to_string());
        self
    }

    pub fn upstream(mut self, version: &str) -> Self {
        self.catalog.upstream_quarkus_core_version = Some(version.to_string());
        self
    }

    /// Add an extension `io.acme:<artifact_id>` at the given version
    pub fn extension_version(mut self, artifact_id: &str, version: &str) -> Self {
        let mut extension = Extension::new(
            ArtifactCoords::jar(EXTENSION_GROUP, artifact_id, version),
            artifact_id,
        );
        extension.origins.push(self.catalog.as_origin());
        self.catalog.extensions.push(extension);
        self
    }

    pub fn extension(self, artifact_id: &str) -> Self {
        self.extension_version(artifact_id, "1.0")
    }

    pub fn offered_extension(mut self, artifact_id: &str, offering: &str) -> Self {
        self = self.extension(artifact_id);
        if let Some(last) = self.catalog.extensions.last_mut() {
            last.metadata.offerings.push(offering.to_string());
        }
        self
    }

    pub fn category(mut self, id: &str, name: &str) -> Self {
        self.catalog.categories.push(Category {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
        });
        self
    }

    /// Set a metadata key as a descriptor would, so typed sections are parsed
    pub fn metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        let mut current = serde_json::to_value(&self.catalog.metadata).unwrap();
        current
            .as_object_mut()
            .unwrap()
            .insert(key.to_string(), value);
        self.catalog.metadata = serde_json::from_value(current).unwrap();
        self
    }

    pub fn derived_from(mut self, other: &ExtensionCatalog) -> Self {
        self.catalog.derived_from.push(other.as_origin());
        self
    }

    /// Mark the catalog as a member of a platform release
    pub fn platform_release(
        mut self,
        platform_key: &str,
        stream: &str,
        version: &str,
        members: &[&ArtifactCoords],
    ) -> Self {
        self.catalog.metadata.platform_release = Some(PlatformReleaseInfo {
            platform_key: platform_key.to_string(),
            stream: stream.to_string(),
            version: version.to_string(),
            members: members.iter().map(|m| m.catalog_artifact()).collect(),
        });
        self
    }

    pub fn build(self) -> ExtensionCatalog {
        self.catalog
    }
}

/// Release of a platform stream
pub fn release(
    version: &str,
    core: &str,
    upstream: Option<&str>,
    members: &[&ArtifactCoords],
) -> PlatformRelease {
    let mut release = PlatformRelease::new(version, core);
    release.upstream_quarkus_core_version = upstream.map(str::to_string);
    release.member_boms = members.iter().map(|m| (*m).clone()).collect();
    release
}

pub fn stream(id: &str, releases: Vec<PlatformRelease>) -> PlatformStream {
    let mut stream = PlatformStream::new(id);
    stream.releases = releases;
    stream
}

pub fn platform(key: &str, streams: Vec<PlatformStream>) -> Platform {
    let mut platform = Platform::new(key);
    platform.streams = streams;
    platform
}

pub fn platform_catalog(platforms: Vec<Platform>) -> PlatformCatalog {
    PlatformCatalog::new(platforms)
}
