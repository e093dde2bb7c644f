//! Per-registry resolution: recognition checks and registry options

use crate::client::RegistryClient;
use crate::error::Result;
use keel_core::config::RegistryConfig;
use keel_core::types::{ArtifactCoords, ExtensionCatalog, PlatformCatalog};
use keel_core::version::{compare_versions, VersionExpression};
use std::cmp::Ordering;
use tracing::debug;

/// How a registry relates to a quarkus-core version or platform BOM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognition {
    NotRecognized,
    Recognized,
    /// Recognized, and no other registry should be asked
    ExclusiveProvider,
}

/// A configured registry together with its client
pub struct RegistryExtensionResolver {
    index: u32,
    config: RegistryConfig,
    recognized_versions: Option<VersionExpression>,
    client: Box<dyn RegistryClient>,
}

impl RegistryExtensionResolver {
    pub fn new(index: u32, config: RegistryConfig, client: Box<dyn RegistryClient>) -> Result<Self> {
        let recognized_versions = config
            .quarkus_versions
            .as_ref()
            .and_then(|v| v.recognized_versions_expression.as_deref())
            .map(VersionExpression::parse)
            .transpose()?;
        Ok(Self {
            index,
            config,
            recognized_versions,
            client,
        })
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Position among the configured registries; lower is preferred
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn check_quarkus_version(&self, version: &str) -> Recognition {
        let Some(expression) = &self.recognized_versions else {
            return Recognition::Recognized;
        };
        if !expression.matches(version) {
            return Recognition::NotRecognized;
        }
        let exclusive = self
            .config
            .quarkus_versions
            .as_ref()
            .is_some_and(|v| v.exclusive_provider);
        if exclusive {
            Recognition::ExclusiveProvider
        } else {
            Recognition::Recognized
        }
    }

    pub fn check_platform(&self, bom: &ArtifactCoords) -> Recognition {
        let group_ids = &self.config.platforms.recognized_group_ids;
        if group_ids.is_empty() {
            Recognition::Recognized
        } else if group_ids.iter().any(|g| g == &bom.group_id) {
            Recognition::ExclusiveProvider
        } else {
            Recognition::NotRecognized
        }
    }

    pub fn resolve_platform_catalog(
        &self,
        quarkus_version: Option<&str>,
    ) -> Result<Option<PlatformCatalog>> {
        let Some(mut catalog) = self.client.resolve_platforms(quarkus_version)? else {
            return Ok(None);
        };
        if quarkus_version.is_none() {
            self.apply_recommended_streams(&mut catalog);
        }
        Ok(Some(catalog))
    }

    pub fn resolve_platform_extensions(&self, bom: &ArtifactCoords) -> Result<ExtensionCatalog> {
        let catalog = self.client.resolve_platform_extensions(bom)?;
        Ok(self.prepare(catalog))
    }

    pub fn resolve_non_platform_extensions(
        &self,
        quarkus_version: &str,
    ) -> Result<Option<ExtensionCatalog>> {
        Ok(self
            .client
            .resolve_non_platform_extensions(quarkus_version)?
            .map(|c| self.prepare(c)))
    }

    pub fn clear_cache(&self) -> Result<()> {
        self.client.clear_cache()
    }

    /// Drop streams older than the configured `recommend-streams-from` bound
    fn apply_recommended_streams(&self, catalog: &mut PlatformCatalog) {
        for (platform_key, from) in &self.config.recommend_streams_from {
            if let Some(platform) = catalog.platform_mut(platform_key) {
                let before = platform.streams.len();
                platform
                    .streams
                    .retain(|s| compare_versions(&s.id, from) != Ordering::Less);
                debug!(
                    "Registry {}: {} stream(s) of {} older than {} not recommended",
                    self.config.id,
                    before - platform.streams.len(),
                    platform_key,
                    from
                );
            }
        }
    }

    /// Make every extension point back at its catalog and apply the offering filter
    fn prepare(&self, mut catalog: ExtensionCatalog) -> ExtensionCatalog {
        let origin = catalog.as_origin();
        for extension in &mut catalog.extensions {
            if !extension.origins.iter().any(|o| o.id == origin.id) {
                extension.origins.push(origin.clone());
            }
        }
        if let Some(offering) = &self.config.offering {
            catalog.retain_extensions(|e| e.metadata.supports_offering(offering));
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::config::RegistryQuarkusVersionsConfig;
    use keel_core::types::{Extension, Platform, PlatformStream};

    struct StaticClient {
        platforms: PlatformCatalog,
        catalog: ExtensionCatalog,
    }

    impl RegistryClient for StaticClient {
        fn resolve_platforms(&self, _: Option<&str>) -> Result<Option<PlatformCatalog>> {
            Ok(Some(self.platforms.clone()))
        }

        fn resolve_platform_extensions(&self, _: &ArtifactCoords) -> Result<ExtensionCatalog> {
            Ok(self.catalog.clone())
        }

        fn resolve_non_platform_extensions(&self, _: &str) -> Result<Option<ExtensionCatalog>> {
            Ok(None)
        }

        fn clear_cache(&self) -> Result<()> {
            Ok(())
        }
    }

    fn registry(config: RegistryConfig) -> RegistryExtensionResolver {
        let mut platform = Platform::new("io.quarkus.platform");
        for id in ["3.10", "3.2", "2.16"] {
            platform.streams.push(PlatformStream::new(id));
        }
        let mut catalog = ExtensionCatalog::new("member", true);
        let mut supported = Extension::new(ArtifactCoords::jar("g", "supported", "1"), "S");
        supported.metadata.offerings.push("supported".into());
        catalog.extensions.push(supported);
        catalog
            .extensions
            .push(Extension::new(ArtifactCoords::jar("g", "community", "1"), "C"));

        let client = StaticClient {
            platforms: PlatformCatalog::new(vec![platform]),
            catalog,
        };
        RegistryExtensionResolver::new(0, config, Box::new(client)).unwrap()
    }

    #[test]
    fn test_version_recognition() {
        let mut config = RegistryConfig::new("r");
        config.quarkus_versions = Some(RegistryQuarkusVersionsConfig {
            recognized_versions_expression: Some("2.*".into()),
            exclusive_provider: true,
        });
        let r = registry(config);
        assert_eq!(r.check_quarkus_version("2.7.1"), Recognition::ExclusiveProvider);
        assert_eq!(r.check_quarkus_version("3.0.0"), Recognition::NotRecognized);

        let open = registry(RegistryConfig::new("open"));
        assert_eq!(open.check_quarkus_version("3.0.0"), Recognition::Recognized);
    }

    #[test]
    fn test_platform_recognition() {
        let mut config = RegistryConfig::new("r");
        config.platforms.recognized_group_ids = vec!["org.acme".into()];
        let r = registry(config);
        assert_eq!(
            r.check_platform(&ArtifactCoords::pom("org.acme", "bom", "1")),
            Recognition::ExclusiveProvider
        );
        assert_eq!(
            r.check_platform(&ArtifactCoords::pom("io.quarkus", "bom", "1")),
            Recognition::NotRecognized
        );
    }

    #[test]
    fn test_recommend_streams_from() {
        let mut config = RegistryConfig::new("r");
        config
            .recommend_streams_from
            .insert("io.quarkus.platform".into(), "3.2".into());
        let r = registry(config);

        let catalog = r.resolve_platform_catalog(None).unwrap().unwrap();
        let ids: Vec<_> = catalog.platforms[0].streams.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["3.10", "3.2"]);

        // a versioned request is answered as published
        let catalog = r.resolve_platform_catalog(Some("2.16.0")).unwrap().unwrap();
        assert_eq!(catalog.platforms[0].streams.len(), 3);
    }

    #[test]
    fn test_offering_filter_and_origins() {
        let mut config = RegistryConfig::new("r");
        config.offering = Some("supported".into());
        let r = registry(config);

        let catalog = r
            .resolve_platform_extensions(&ArtifactCoords::pom("g", "bom", "1"))
            .unwrap();
        assert_eq!(catalog.extensions.len(), 1);
        assert_eq!(catalog.extensions[0].artifact.artifact_id, "supported");
        assert_eq!(catalog.extensions[0].origins[0].id, "member");
    }
}
