//! Multi-registry extension catalog resolution
//!
//! Every platform member catalog a registry offers is tagged with an
//! [`OriginPreference`]: the registry's position, the platform's position in
//! that registry, the release's position in its stream, the member's position
//! in the release and the compatibility code of the release's core version.
//! Non-platform catalogs follow all platform catalogs. The tagged catalogs
//! are then merged into one, most preferred first.

use crate::arena::{CatalogArena, Stage};
use crate::client::{RegistryClient, RegistryClientFactory};
use crate::error::{RegistryError, Result};
use crate::maven::MavenRegistryClientFactory;
use crate::merge::{merge_catalogs, merge_platform_catalogs};
use crate::registry_resolver::{Recognition, RegistryExtensionResolver};
use indexmap::IndexMap;
use keel_core::config::{RegistriesConfig, RegistryConfig};
use keel_core::types::{
    ArtifactCoords, ExtensionCatalog, OriginPreference, Platform, PlatformCatalog,
    PlatformRelease, PlatformStream, StreamCoords,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Builder for [`ExtensionCatalogResolver`]
#[derive(Default)]
pub struct ExtensionCatalogResolverBuilder {
    config: Option<RegistriesConfig>,
    factory: Option<Box<dyn RegistryClientFactory>>,
    clients: Vec<(RegistryConfig, Box<dyn RegistryClient>)>,
}

impl ExtensionCatalogResolverBuilder {
    /// Registries to resolve from; defaults to the built-in configuration
    pub fn config(mut self, config: RegistriesConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Factory creating clients for configured registries
    pub fn client_factory(mut self, factory: impl RegistryClientFactory + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Register a ready-made client; when any are given the configuration is not used
    pub fn registry_client(mut self, config: RegistryConfig, client: impl RegistryClient + 'static) -> Self {
        let client: Box<dyn RegistryClient> = Box::new(client);
        self.clients.push((config, client));
        self
    }

    pub fn build(self) -> Result<ExtensionCatalogResolver> {
        let clients = if self.clients.is_empty() {
            let config = self.config.unwrap_or_default();
            let factory: Box<dyn RegistryClientFactory> = match self.factory {
                Some(factory) => factory,
                None => Box::new(MavenRegistryClientFactory::new(
                    MavenRegistryClientFactory::default_cache_dir()?,
                )),
            };
            config
                .enabled_registries()
                .map(|r| -> Result<(RegistryConfig, Box<dyn RegistryClient>)> {
                    Ok((r.clone(), factory.build_client(r)?))
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            self.clients
        };

        let registries = clients
            .into_iter()
            .enumerate()
            .map(|(i, (config, client))| RegistryExtensionResolver::new(i as u32, config, client))
            .collect::<Result<Vec<_>>>()?;
        debug!("Resolver built with {} registries", registries.len());
        Ok(ExtensionCatalogResolver { registries })
    }
}

/// Resolves extension catalogs across all configured registries
pub struct ExtensionCatalogResolver {
    registries: Vec<RegistryExtensionResolver>,
}

impl ExtensionCatalogResolver {
    pub fn builder() -> ExtensionCatalogResolverBuilder {
        ExtensionCatalogResolverBuilder::default()
    }

    /// A resolver without registries
    pub fn empty() -> Self {
        Self {
            registries: Vec::new(),
        }
    }

    pub fn has_registries(&self) -> bool {
        !self.registries.is_empty()
    }

    pub fn registries(&self) -> &[RegistryExtensionResolver] {
        &self.registries
    }

    /// Platforms offered by all registries, merged by platform key
    pub fn resolve_platform_catalog(
        &self,
        quarkus_version: Option<&str>,
    ) -> Result<Option<PlatformCatalog>> {
        let mut catalogs = Vec::new();
        let mut last_error = None;
        let mut failures = 0;
        for registry in &self.registries {
            match registry.resolve_platform_catalog(quarkus_version) {
                Ok(Some(catalog)) => catalogs.push(catalog),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        "Failed to resolve platform catalog from registry {}: {}",
                        registry.id(),
                        e
                    );
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        if catalogs.is_empty() {
            return match last_error {
                Some(e) if failures == self.registries.len() => Err(e),
                _ => Ok(None),
            };
        }
        merge_platform_catalogs(catalogs).map(Some)
    }

    pub fn resolve_platform_catalog_from_registry(
        &self,
        registry_id: &str,
        quarkus_version: Option<&str>,
    ) -> Result<Option<PlatformCatalog>> {
        let registry = self
            .registries
            .iter()
            .find(|r| r.id() == registry_id)
            .ok_or_else(|| RegistryError::UnknownRegistry {
                id: registry_id.to_string(),
                configured: self.registry_ids(),
            })?;
        registry.resolve_platform_catalog(quarkus_version)
    }

    /// Every extension every registry offers
    pub fn resolve_extension_catalog(&self) -> Result<ExtensionCatalog> {
        self.ensure_registries_configured()?;
        let mut collector = Collector::new(self);

        for registry in &self.registries {
            collector.queried(registry);
            let Some(catalog) = Self::platforms_of(registry, None) else {
                continue;
            };
            for (i, platform) in catalog.platforms.iter().enumerate() {
                collector.collect_platform(registry, 0, i as u32 + 1, platform, None);
            }
        }

        collector.build()
    }

    /// Extensions compatible with a quarkus-core version
    pub fn resolve_extension_catalog_for_version(
        &self,
        quarkus_version: &str,
    ) -> Result<ExtensionCatalog> {
        self.ensure_registries_configured()?;
        let mut collector = Collector::new(self);
        collector.collect_versions(quarkus_version, &IndexMap::new())?;
        collector.build()
    }

    /// Extensions of the releases of a platform stream
    ///
    /// The stream is taken from the first registry offering it (or, with a
    /// platform key, from the first registry offering that platform).
    pub fn resolve_extension_catalog_for_stream(
        &self,
        stream: &StreamCoords,
    ) -> Result<ExtensionCatalog> {
        self.ensure_registries_configured()?;
        let mut collector = Collector::new(self);

        let Some((registry, found)) = self.locate_stream(stream) else {
            return Err(self.stream_not_found(stream));
        };
        collector.queried(registry);

        for (i, release) in found.releases.iter().enumerate() {
            let slot = ReleaseSlot {
                pass: 0,
                platform_index: 1,
                stream_index: 1,
                release_index: i as u32 + 1,
            };
            collector.collect_release(registry, slot, release, None);
        }

        collector.build()
    }

    /// Extensions for a project importing the given platform BOMs
    ///
    /// The platforms the BOMs belong to are preferred over any other platform
    /// of the same registry; the rest of the catalog is completed for the
    /// core version of the first resolved BOM.
    pub fn resolve_extension_catalog_for_platforms(
        &self,
        boms: &[ArtifactCoords],
    ) -> Result<ExtensionCatalog> {
        if boms.is_empty() {
            return self.resolve_extension_catalog();
        }
        self.ensure_registries_configured()?;
        let mut collector = Collector::new(self);

        let mut preferred: IndexMap<String, Platform> = IndexMap::new();
        let mut quarkus_version: Option<String> = None;
        let mut platform_index = 0;

        for bom in boms {
            let candidates = self.filter_registries(
                |r| r.check_platform(bom),
                || format!("the {} platform", bom),
            )?;
            let Some(catalog) = collector.resolve_member(bom, &candidates) else {
                continue;
            };
            if quarkus_version.is_none() {
                quarkus_version.clone_from(&catalog.quarkus_core_version);
            }

            if let Some(info) = &catalog.metadata.platform_release {
                if preferred.contains_key(&info.platform_key) {
                    continue;
                }
                let mut release = PlatformRelease::new(
                    info.version.clone(),
                    catalog.quarkus_core_version.clone().unwrap_or_default(),
                );
                release
                    .upstream_quarkus_core_version
                    .clone_from(&catalog.upstream_quarkus_core_version);
                release.member_boms.clone_from(&info.members);

                let mut stream = PlatformStream::new(info.stream.clone());
                stream.releases.push(release);
                let mut platform = Platform::new(info.platform_key.clone());
                platform.streams.push(stream);
                debug!("Preferring platform {} for {}", info.platform_key, bom);
                preferred.insert(info.platform_key.clone(), platform);
                continue;
            }

            platform_index += 1;
            let code = match quarkus_version.as_deref() {
                Some(version) => collector.compatibility_code(version, None),
                None => collector.reserve_code(),
            };
            collector.arena.push(
                Stage::Direct,
                0,
                OriginPreference::new(0, platform_index, 1, 1, code),
                catalog,
            );
        }

        if !preferred.is_empty() {
            let Some(version) = quarkus_version else {
                return Err(RegistryError::resolution_failed(
                    "Failed to determine the quarkus-core version of the preferred platforms",
                ));
            };
            collector.collect_versions(&version, &preferred)?;
        }
        collector.build()
    }

    /// Clear every registry's cache; a failing registry does not stop the others
    ///
    /// Returns the ids of the registries that failed.
    pub fn clear_registry_cache(&self) -> Vec<String> {
        let mut failed = Vec::new();
        for registry in &self.registries {
            if let Err(e) = registry.clear_cache() {
                warn!("Failed to clear cache of registry {}: {}", registry.id(), e);
                failed.push(registry.id().to_string());
            }
        }
        failed
    }

    fn registry_ids(&self) -> Vec<String> {
        self.registries.iter().map(|r| r.id().to_string()).collect()
    }

    fn ensure_registries_configured(&self) -> Result<()> {
        if self.registries.is_empty() {
            return Err(RegistryError::NoRegistriesConfigured);
        }
        Ok(())
    }

    /// Platform catalog of a registry; failures are logged and treated as absent
    fn platforms_of(
        registry: &RegistryExtensionResolver,
        quarkus_version: Option<&str>,
    ) -> Option<PlatformCatalog> {
        match registry.resolve_platform_catalog(quarkus_version) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    "Failed to resolve platform catalog from registry {}: {}",
                    registry.id(),
                    e
                );
                None
            }
        }
    }

    fn locate_stream(
        &self,
        coords: &StreamCoords,
    ) -> Option<(&RegistryExtensionResolver, PlatformStream)> {
        for registry in &self.registries {
            let Some(catalog) = Self::platforms_of(registry, None) else {
                continue;
            };
            match &coords.platform_key {
                None => {
                    let stream = catalog
                        .platforms
                        .iter()
                        .find_map(|p| p.stream(&coords.stream_id));
                    if let Some(stream) = stream {
                        return Some((registry, stream.clone()));
                    }
                }
                Some(key) => {
                    let Some(platform) = catalog.platform(key) else {
                        continue;
                    };
                    return platform
                        .stream(&coords.stream_id)
                        .map(|s| (registry, s.clone()));
                }
            }
        }
        None
    }

    fn stream_not_found(&self, coords: &StreamCoords) -> RegistryError {
        let mut requested = None;
        let mut known = Vec::new();
        for registry in &self.registries {
            let Some(catalog) = Self::platforms_of(registry, None) else {
                continue;
            };
            if let Some(key) = &coords.platform_key {
                if catalog.platform(key).is_some() {
                    requested = Some(key.clone());
                    break;
                }
            }
            known.extend(catalog.platforms.into_iter().map(|p| p.platform_key));
        }

        let message = match (requested, &coords.platform_key) {
            (Some(key), _) => format!(
                "Failed to locate stream {} in platform {}",
                coords.stream_id, key
            ),
            (None, _) if known.is_empty() => "None of the registries provided any platform".to_string(),
            (None, None) => format!(
                "Failed to locate stream {} in platform(s): {}",
                coords.stream_id,
                known.join(", ")
            ),
            (None, Some(key)) => format!(
                "Failed to locate platform {} among available platform(s): {}",
                key,
                known.join(", ")
            ),
        };
        RegistryError::resolution_failed(message)
    }

    /// Registries to ask, honoring exclusive providers
    fn filter_registries(
        &self,
        recognize: impl Fn(&RegistryExtensionResolver) -> Recognition,
        subject: impl FnOnce() -> String,
    ) -> Result<Vec<usize>> {
        let mut recognized = Vec::new();
        let mut exclusive = Vec::new();
        for (i, registry) in self.registries.iter().enumerate() {
            match recognize(registry) {
                Recognition::NotRecognized => {}
                Recognition::Recognized => recognized.push(i),
                Recognition::ExclusiveProvider => {
                    recognized.push(i);
                    exclusive.push(i);
                }
            }
        }

        match exclusive.len() {
            0 => Ok(recognized),
            1 => Ok(exclusive),
            _ => Err(RegistryError::exclusive_conflict(
                subject(),
                exclusive
                    .iter()
                    .map(|&i| self.registries[i].id().to_string())
                    .collect(),
            )),
        }
    }
}

/// Where a platform release sits within a collection pass
#[derive(Debug, Clone, Copy)]
struct ReleaseSlot {
    pass: u32,
    platform_index: u32,
    stream_index: u32,
    release_index: u32,
}

/// State of a single catalog resolution
struct Collector<'a> {
    resolver: &'a ExtensionCatalogResolver,
    arena: CatalogArena,
    /// Compatibility codes by core version, in the order versions were seen
    codes: IndexMap<String, u32>,
    next_code: u32,
    registries_by_version: HashMap<String, Vec<usize>>,
    queried: Vec<String>,
}

impl<'a> Collector<'a> {
    fn new(resolver: &'a ExtensionCatalogResolver) -> Self {
        Self {
            resolver,
            arena: CatalogArena::new(),
            codes: IndexMap::new(),
            next_code: 0,
            registries_by_version: HashMap::new(),
            queried: Vec::new(),
        }
    }

    fn queried(&mut self, registry: &RegistryExtensionResolver) {
        if !self.queried.iter().any(|id| id == registry.id()) {
            self.queried.push(registry.id().to_string());
        }
    }

    /// Dense code shared by a core version and its upstream version
    fn compatibility_code(&mut self, version: &str, upstream: Option<&str>) -> u32 {
        if let Some(&code) = self.codes.get(version) {
            return code;
        }
        let code = match upstream.and_then(|u| self.codes.get(u).copied()) {
            Some(code) => code,
            None => {
                let code = self.next_code;
                self.next_code += 1;
                if let Some(upstream) = upstream {
                    self.codes.insert(upstream.to_string(), code);
                }
                code
            }
        };
        self.codes.insert(version.to_string(), code);
        code
    }

    /// Code for a catalog of unknown core version, shared with no other
    fn reserve_code(&mut self) -> u32 {
        let code = self.next_code;
        self.next_code += 1;
        code
    }

    fn registries_for_version(&mut self, version: &str) -> Result<Vec<usize>> {
        if let Some(found) = self.registries_by_version.get(version) {
            return Ok(found.clone());
        }
        let found = self.resolver.filter_registries(
            |r| r.check_quarkus_version(version),
            || format!("extensions based on Quarkus version {}", version),
        )?;
        self.registries_by_version
            .insert(version.to_string(), found.clone());
        Ok(found)
    }

    /// Platform passes for `version` and then for every upstream version met
    fn collect_versions(&mut self, version: &str, preferred: &IndexMap<String, Platform>) -> Result<()> {
        let mut versions = vec![version.to_string()];
        let mut pass = 0;
        while pass < versions.len() {
            let current = versions[pass].clone();
            self.collect_version(&current, pass as u32, preferred, &mut versions)?;
            pass += 1;
        }
        Ok(())
    }

    fn collect_version(
        &mut self,
        version: &str,
        pass: u32,
        preferred: &IndexMap<String, Platform>,
        versions: &mut Vec<String>,
    ) -> Result<()> {
        let resolver = self.resolver;
        for i in self.registries_for_version(version)? {
            let registry = &resolver.registries[i];
            self.queried(registry);
            let Some(catalog) = ExtensionCatalogResolver::platforms_of(registry, Some(version)) else {
                continue;
            };
            if catalog.is_empty() {
                continue;
            }

            let mut platform_index = 0;
            for platform in preferred.values() {
                platform_index += 1;
                self.collect_platform(registry, pass, platform_index, platform, Some(&mut *versions));
            }
            for platform in &catalog.platforms {
                if preferred.contains_key(&platform.platform_key) {
                    continue;
                }
                platform_index += 1;
                self.collect_platform(registry, pass, platform_index, platform, Some(&mut *versions));
            }
        }
        Ok(())
    }

    fn collect_platform(
        &mut self,
        registry: &RegistryExtensionResolver,
        pass: u32,
        platform_index: u32,
        platform: &Platform,
        mut upstream_versions: Option<&mut Vec<String>>,
    ) {
        for (s, stream) in platform.streams.iter().enumerate() {
            for (i, release) in stream.releases.iter().enumerate() {
                let slot = ReleaseSlot {
                    pass,
                    platform_index,
                    stream_index: s as u32 + 1,
                    release_index: i as u32 + 1,
                };
                self.collect_release(registry, slot, release, upstream_versions.as_deref_mut());
            }
        }
    }

    fn collect_release(
        &mut self,
        registry: &RegistryExtensionResolver,
        slot: ReleaseSlot,
        release: &PlatformRelease,
        upstream_versions: Option<&mut Vec<String>>,
    ) {
        let code = self.compatibility_code(
            &release.quarkus_core_version,
            release.upstream_quarkus_core_version.as_deref(),
        );

        let mut member_index = 0;
        for bom in &release.member_boms {
            match registry.resolve_platform_extensions(bom) {
                Ok(catalog) => {
                    member_index += 1;
                    let preference = OriginPreference::new(
                        registry.index(),
                        slot.platform_index,
                        slot.release_index,
                        member_index,
                        code,
                    );
                    self.arena.push(
                        Stage::Platform { pass: slot.pass },
                        slot.stream_index,
                        preference,
                        catalog,
                    );
                }
                Err(e) => warn!(
                    "Failed to resolve extension catalog for {} from registry {}: {}",
                    bom,
                    registry.id(),
                    e
                ),
            }
        }

        if let (Some(versions), Some(upstream)) =
            (upstream_versions, &release.upstream_quarkus_core_version)
        {
            if !versions.contains(upstream) {
                versions.push(upstream.clone());
            }
        }
    }

    /// Member catalog of `bom` from the first candidate registry able to provide it
    fn resolve_member(&mut self, bom: &ArtifactCoords, candidates: &[usize]) -> Option<ExtensionCatalog> {
        if candidates.is_empty() {
            debug!("None of the configured registries recognizes platform {}", bom);
            return None;
        }
        let resolver = self.resolver;
        for &i in candidates {
            let registry = &resolver.registries[i];
            self.queried(registry);
            match registry.resolve_platform_extensions(bom) {
                Ok(catalog) => return Some(catalog),
                Err(e) => debug!("Registry {} failed to provide {}: {}", registry.id(), bom, e),
            }
        }
        let ids: Vec<&str> = candidates
            .iter()
            .map(|&i| resolver.registries[i].id())
            .collect();
        warn!(
            "Failed to resolve platform {} using the following registries: {}",
            bom,
            ids.join(", ")
        );
        None
    }

    /// Append non-platform catalogs for every known core version and merge
    fn build(mut self) -> Result<ExtensionCatalog> {
        let resolver = self.resolver;
        let versions: Vec<(String, u32)> = self
            .codes
            .iter()
            .map(|(v, &c)| (v.clone(), c))
            .collect();

        for (version, code) in versions {
            for i in self.registries_for_version(&version)? {
                let registry = &resolver.registries[i];
                self.queried(registry);
                match registry.resolve_non_platform_extensions(&version) {
                    Ok(Some(catalog)) => self.arena.push(
                        Stage::Community {
                            compatibility_code: code,
                        },
                        0,
                        OriginPreference::community(registry.index(), code),
                        catalog,
                    ),
                    Ok(None) => {}
                    Err(e) => warn!(
                        "Failed to resolve non-platform extensions for {} from registry {}: {}",
                        version,
                        registry.id(),
                        e
                    ),
                }
            }
        }

        if self.arena.is_empty() {
            let ids = if self.queried.is_empty() {
                resolver.registry_ids()
            } else {
                self.queried
            };
            return Err(RegistryError::resolution_failed(format!(
                "Failed to resolve any extension catalog from registries: {}",
                ids.join(", ")
            )));
        }

        info!("Merging {} extension catalogs", self.arena.len());
        merge_catalogs(self.arena.into_sorted())
    }
}
