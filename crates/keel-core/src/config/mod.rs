//! Registries configuration loading and management

mod loader;
mod registries;

pub use loader::{RegistriesConfigLoader, CONFIG_FILE_NAME};
pub use registries::{
    MavenRepositoryConfig, RegistriesConfig, RegistryConfig, RegistryMavenConfig,
    RegistryNonPlatformExtensionsConfig, RegistryPlatformsConfig, RegistryQuarkusVersionsConfig,
    DEFAULT_NON_PLATFORM_ARTIFACT_ID, DEFAULT_PLATFORMS_ARTIFACT_ID,
    DEFAULT_REGISTRY_ARTIFACT_VERSION, DEFAULT_REGISTRY_ID,
};
