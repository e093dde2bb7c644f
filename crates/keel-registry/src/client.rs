//! Registry client abstraction

use crate::error::Result;
use keel_core::config::RegistryConfig;
use keel_core::types::{ArtifactCoords, ExtensionCatalog, PlatformCatalog};

/// Access to the descriptors a single registry publishes
///
/// `Ok(None)` means the registry does not publish the requested descriptor;
/// errors are reserved for failures to reach or read it.
pub trait RegistryClient: Send + Sync {
    /// Platform catalog, optionally narrowed to a quarkus-core version
    fn resolve_platforms(&self, quarkus_version: Option<&str>) -> Result<Option<PlatformCatalog>>;

    /// Extension catalog of a platform member BOM
    fn resolve_platform_extensions(&self, bom: &ArtifactCoords) -> Result<ExtensionCatalog>;

    /// Non-platform extensions compatible with a quarkus-core version
    fn resolve_non_platform_extensions(
        &self,
        quarkus_version: &str,
    ) -> Result<Option<ExtensionCatalog>>;

    /// Drop everything cached for this registry
    fn clear_cache(&self) -> Result<()>;
}

/// Creates a client for a configured registry
pub trait RegistryClientFactory {
    fn build_client(&self, config: &RegistryConfig) -> Result<Box<dyn RegistryClient>>;
}
