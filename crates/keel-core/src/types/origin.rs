//! Extension origins and origin preference

use super::coords::ArtifactCoords;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sortable priority of a resolved extension catalog; lower is preferred
///
/// Field order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OriginPreference {
    pub registry_index: u32,
    pub platform_index: u32,
    pub release_index: u32,
    pub member_index: u32,
    pub compatibility_code: u32,
}

impl OriginPreference {
    pub fn new(
        registry_index: u32,
        platform_index: u32,
        release_index: u32,
        member_index: u32,
        compatibility_code: u32,
    ) -> Self {
        Self {
            registry_index,
            platform_index,
            release_index,
            member_index,
            compatibility_code,
        }
    }

    /// Preference of a registry's non-platform catalog
    ///
    /// Sorts after every platform of the same registry.
    pub fn community(registry_index: u32, compatibility_code: u32) -> Self {
        Self::new(
            registry_index,
            u32::MAX,
            compatibility_code,
            0,
            compatibility_code,
        )
    }
}

impl fmt::Display for OriginPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {} {}]",
            self.registry_index,
            self.platform_index,
            self.release_index,
            self.member_index,
            self.compatibility_code
        )
    }
}

/// How a catalog entered the resolution result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CatalogOrigin {
    /// Member catalog of a platform release
    Platform { preference: OriginPreference },
    /// A registry's non-platform extensions
    Community { preference: OriginPreference },
}

impl CatalogOrigin {
    pub fn preference(&self) -> OriginPreference {
        match self {
            CatalogOrigin::Platform { preference } | CatalogOrigin::Community { preference } => {
                *preference
            }
        }
    }

    pub fn is_platform(&self) -> bool {
        matches!(self, CatalogOrigin::Platform { .. })
    }
}

/// Reference from an extension to a catalog that provides it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionOrigin {
    /// Id of the providing catalog; the dedup key
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bom: Option<ArtifactCoords>,

    #[serde(default)]
    pub platform: bool,

    /// Set once the providing catalog has been ranked by the resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<CatalogOrigin>,
}

impl ExtensionOrigin {
    pub fn new(id: impl Into<String>, bom: Option<ArtifactCoords>, platform: bool) -> Self {
        Self {
            id: id.into(),
            bom,
            platform,
            resolution: None,
        }
    }

    pub fn preference(&self) -> Option<OriginPreference> {
        self.resolution.map(|r| r.preference())
    }
}
