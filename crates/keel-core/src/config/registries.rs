//! Registries configuration types
//!
//! A registry entry in config.yaml is either a bare id or a single-key map
//! of id to options:
//!
//! ```yaml
//! registries:
//!   - registry.quarkus.io
//!   - registry.example.org:
//!       quarkus-versions:
//!         recognized-versions-expression: "2.*"
//!         exclusive-provider: true
//! ```

use crate::types::ArtifactCoords;
use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Id of the registry used when nothing is configured
pub const DEFAULT_REGISTRY_ID: &str = "registry.quarkus.io";

/// Version of the registry descriptor artifacts
pub const DEFAULT_REGISTRY_ARTIFACT_VERSION: &str = "1.0-SNAPSHOT";

pub const DEFAULT_PLATFORMS_ARTIFACT_ID: &str = "quarkus-platforms";
pub const DEFAULT_NON_PLATFORM_ARTIFACT_ID: &str = "quarkus-non-platform-extensions";

/// All configured registries, in preference order
#[derive(Debug, Clone, PartialEq)]
pub struct RegistriesConfig {
    pub debug: bool,
    pub registries: Vec<RegistryConfig>,
    /// File the configuration was read from, if any
    pub source: Option<Utf8PathBuf>,
}

impl Default for RegistriesConfig {
    fn default() -> Self {
        Self {
            debug: false,
            registries: vec![RegistryConfig::new(DEFAULT_REGISTRY_ID)],
            source: None,
        }
    }
}

impl RegistriesConfig {
    pub fn registry(&self, id: &str) -> Option<&RegistryConfig> {
        self.registries.iter().find(|r| r.id == id)
    }

    pub fn enabled_registries(&self) -> impl Iterator<Item = &RegistryConfig> {
        self.registries.iter().filter(|r| r.enabled)
    }
}

/// A single registry
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    pub id: String,
    pub enabled: bool,
    pub update_policy: Option<String>,
    pub platforms: RegistryPlatformsConfig,
    pub non_platform_extensions: RegistryNonPlatformExtensionsConfig,
    pub quarkus_versions: Option<RegistryQuarkusVersionsConfig>,
    pub maven: RegistryMavenConfig,
    /// Keep only extensions supported by this offering
    pub offering: Option<String>,
    /// Per platform key, the oldest stream id worth recommending
    pub recommend_streams_from: IndexMap<String, String>,
    /// Options without a typed counterpart
    pub extra: IndexMap<String, serde_yaml_ng::Value>,
}

impl RegistryConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_options(id.into(), RegistryOptions::default())
    }

    fn from_options(id: String, options: RegistryOptions) -> Self {
        Self {
            id,
            enabled: options.enabled.unwrap_or(true),
            update_policy: options.update_policy,
            platforms: options.platforms,
            non_platform_extensions: options.non_platform_extensions,
            quarkus_versions: options.quarkus_versions,
            maven: options.maven,
            offering: options.offering,
            recommend_streams_from: options.recommend_streams_from,
            extra: options.extra,
        }
    }

    fn to_options(&self) -> RegistryOptions {
        RegistryOptions {
            enabled: (!self.enabled).then_some(false),
            update_policy: self.update_policy.clone(),
            platforms: self.platforms.clone(),
            non_platform_extensions: self.non_platform_extensions.clone(),
            quarkus_versions: self.quarkus_versions.clone(),
            maven: self.maven.clone(),
            offering: self.offering.clone(),
            recommend_streams_from: self.recommend_streams_from.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Maven groupId of the registry's descriptor artifacts
    ///
    /// The id's domain segments reversed: `registry.quarkus.io` → `io.quarkus.registry`.
    pub fn group_id(&self) -> String {
        self.id.split('.').rev().collect::<Vec<_>>().join(".")
    }

    /// Coordinates of the platform catalog descriptor
    pub fn platforms_artifact(&self) -> ArtifactCoords {
        self.platforms.artifact.clone().unwrap_or_else(|| {
            ArtifactCoords::new(
                self.group_id(),
                DEFAULT_PLATFORMS_ARTIFACT_ID,
                "",
                "json",
                DEFAULT_REGISTRY_ARTIFACT_VERSION,
            )
        })
    }

    /// Coordinates of the non-platform extension catalog descriptor
    pub fn non_platform_artifact(&self) -> ArtifactCoords {
        self.non_platform_extensions
            .artifact
            .clone()
            .unwrap_or_else(|| {
                ArtifactCoords::new(
                    self.group_id(),
                    DEFAULT_NON_PLATFORM_ARTIFACT_ID,
                    "",
                    "json",
                    DEFAULT_REGISTRY_ARTIFACT_VERSION,
                )
            })
    }

    /// Base URL of the Maven repository serving the registry's artifacts
    pub fn repository_url(&self) -> String {
        self.maven
            .repository
            .as_ref()
            .map(|r| r.url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}/maven", self.id))
    }
}

/// Platform catalog options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryPlatformsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactCoords>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    /// Platform BOM groupIds this registry exclusively provides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recognized_group_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub extension_catalogs_included: bool,
}

/// Non-platform extension catalog options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryNonPlatformExtensionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactCoords>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Which core versions a registry serves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryQuarkusVersionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognized_versions_expression: Option<String>,

    /// Recognized versions are served by this registry only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_provider: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryMavenConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<MavenRepositoryConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MavenRepositoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
}

/// On-disk shape of a registry's options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RegistryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    update_policy: Option<String>,

    #[serde(default, skip_serializing_if = "is_default")]
    platforms: RegistryPlatformsConfig,

    #[serde(default, skip_serializing_if = "is_default")]
    non_platform_extensions: RegistryNonPlatformExtensionsConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    quarkus_versions: Option<RegistryQuarkusVersionsConfig>,

    #[serde(default, skip_serializing_if = "is_default")]
    maven: RegistryMavenConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    offering: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    recommend_streams_from: IndexMap<String, String>,

    #[serde(flatten)]
    extra: IndexMap<String, serde_yaml_ng::Value>,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    value == &T::default()
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RegistryEntry {
    Id(String),
    Configured(IndexMap<String, Option<RegistryOptions>>),
}

#[derive(Serialize, Deserialize)]
struct RegistriesConfigFile {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    debug: bool,

    #[serde(default)]
    registries: Vec<RegistryEntry>,
}

impl<'de> Deserialize<'de> for RegistriesConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let file = RegistriesConfigFile::deserialize(deserializer)?;
        let mut registries = Vec::new();
        for entry in file.registries {
            match entry {
                RegistryEntry::Id(id) => registries.push(RegistryConfig::new(id)),
                RegistryEntry::Configured(map) => {
                    for (id, options) in map {
                        registries
                            .push(RegistryConfig::from_options(id, options.unwrap_or_default()));
                    }
                }
            }
        }
        Ok(Self {
            debug: file.debug,
            registries,
            source: None,
        })
    }
}

impl Serialize for RegistriesConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let registries = self
            .registries
            .iter()
            .map(|r| {
                let options = r.to_options();
                if is_plain(&options) {
                    RegistryEntry::Id(r.id.clone())
                } else {
                    RegistryEntry::Configured(IndexMap::from([(r.id.clone(), Some(options))]))
                }
            })
            .collect();
        RegistriesConfigFile {
            debug: self.debug,
            registries,
        }
        .serialize(serializer)
    }
}

fn is_plain(options: &RegistryOptions) -> bool {
    options.enabled.is_none()
        && options.update_policy.is_none()
        && is_default(&options.platforms)
        && is_default(&options.non_platform_extensions)
        && options.quarkus_versions.is_none()
        && is_default(&options.maven)
        && options.offering.is_none()
        && options.recommend_streams_from.is_empty()
        && options.extra.is_empty()
}
