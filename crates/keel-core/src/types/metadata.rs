//! Typed catalog metadata and put-if-absent merging
//!
//! Catalog metadata is a closed schema: the keys the resolver and the CLI
//! understand are typed fields, everything else is carried through verbatim
//! in `other`. Merging never overwrites a value that is already present;
//! nested maps are merged key by key.

use super::coords::ArtifactCoords;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form metadata map (stream, platform and catalog level)
pub type Metadata = IndexMap<String, Value>;

/// Recursive put-if-absent merge
pub trait MergeAbsent {
    /// Fill in whatever `self` lacks from `other`, never overwriting
    fn merge_absent(&mut self, other: &Self);
}

impl MergeAbsent for String {
    fn merge_absent(&mut self, _other: &Self) {}
}

impl MergeAbsent for bool {
    fn merge_absent(&mut self, _other: &Self) {}
}

impl<T: MergeAbsent + Clone> MergeAbsent for Option<T> {
    fn merge_absent(&mut self, other: &Self) {
        let Some(incoming) = other else {
            return;
        };
        if let Some(current) = self {
            current.merge_absent(incoming);
        } else {
            *self = Some(incoming.clone());
        }
    }
}

/// Lists are values: an empty list counts as absent
impl<T: Clone> MergeAbsent for Vec<T> {
    fn merge_absent(&mut self, other: &Self) {
        if self.is_empty() {
            self.clone_from(other);
        }
    }
}

impl<V: MergeAbsent + Clone> MergeAbsent for IndexMap<String, V> {
    fn merge_absent(&mut self, other: &Self) {
        for (key, incoming) in other {
            match self.get_mut(key) {
                Some(current) => current.merge_absent(incoming),
                None => {
                    self.insert(key.clone(), incoming.clone());
                }
            }
        }
    }
}

impl MergeAbsent for Value {
    fn merge_absent(&mut self, other: &Self) {
        if let (Value::Object(current), Value::Object(incoming)) = (self, other) {
            for (key, value) in incoming {
                match current.get_mut(key) {
                    Some(existing) => existing.merge_absent(value),
                    None => {
                        current.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }
}

/// Metadata attached to an extension catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogMetadata {
    /// Platform release a member catalog belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_release: Option<PlatformReleaseInfo>,

    /// Project generation hints (build properties, codestart artifacts)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectMetadata>,

    /// Keys without a typed counterpart
    #[serde(flatten)]
    pub other: Metadata,
}

impl CatalogMetadata {
    pub fn is_empty(&self) -> bool {
        self.platform_release.is_none() && self.project.is_none() && self.other.is_empty()
    }
}

impl MergeAbsent for CatalogMetadata {
    fn merge_absent(&mut self, other: &Self) {
        self.platform_release.merge_absent(&other.platform_release);
        self.project.merge_absent(&other.project);
        self.other.merge_absent(&other.other);
    }
}

/// `platform-release` section of a member catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformReleaseInfo {
    pub platform_key: String,

    #[serde(default = "default_stream")]
    pub stream: String,

    #[serde(default = "default_stream")]
    pub version: String,

    /// Catalog coordinates of every member of the release
    #[serde(default)]
    pub members: Vec<ArtifactCoords>,
}

fn default_stream() -> String {
    "default".to_string()
}

/// A release section is an atomic value
impl MergeAbsent for PlatformReleaseInfo {
    fn merge_absent(&mut self, _other: &Self) {}
}

/// `project` section of catalog metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectMetadata {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codestarts_artifacts: Vec<String>,

    #[serde(flatten)]
    pub other: Metadata,
}

impl MergeAbsent for ProjectMetadata {
    fn merge_absent(&mut self, other: &Self) {
        self.properties.merge_absent(&other.properties);
        self.codestarts_artifacts
            .merge_absent(&other.codestarts_artifacts);
        self.other.merge_absent(&other.other);
    }
}

/// Metadata attached to a single extension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unlisted: bool,

    /// Product offerings supporting this extension
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offerings: Vec<String>,

    #[serde(flatten)]
    pub other: Metadata,
}

impl ExtensionMetadata {
    /// Whether the extension is part of the given offering
    pub fn supports_offering(&self, offering: &str) -> bool {
        self.offerings.iter().any(|o| o == offering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn metadata(value: Value) -> Metadata {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_values_are_never_overwritten() {
        let mut current = metadata(json!({"a": 1, "b": "x"}));
        current.merge_absent(&metadata(json!({"a": 2, "c": true})));
        assert_eq!(current, metadata(json!({"a": 1, "b": "x", "c": true})));
    }

    #[test]
    fn test_nested_maps_merge_key_by_key() {
        let mut current = metadata(json!({"project": {"properties": {"x": "1"}}}));
        current.merge_absent(&metadata(
            json!({"project": {"properties": {"x": "2", "y": "3"}, "extra": 1}}),
        ));
        assert_eq!(
            current,
            metadata(json!({"project": {"properties": {"x": "1", "y": "3"}, "extra": 1}}))
        );
    }

    #[test]
    fn test_map_does_not_replace_scalar() {
        let mut current = metadata(json!({"k": "scalar"}));
        current.merge_absent(&metadata(json!({"k": {"nested": true}})));
        assert_eq!(current, metadata(json!({"k": "scalar"})));
    }

    #[test]
    fn test_catalog_metadata_typed_merge() {
        let mut current = CatalogMetadata {
            project: Some(ProjectMetadata {
                properties: IndexMap::from([("plugin-version".to_string(), "1".to_string())]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let incoming = CatalogMetadata {
            platform_release: Some(PlatformReleaseInfo {
                platform_key: "io.quarkus.platform".to_string(),
                stream: "2.7".to_string(),
                version: "2.7.1".to_string(),
                members: vec![],
            }),
            project: Some(ProjectMetadata {
                properties: IndexMap::from([
                    ("plugin-version".to_string(), "2".to_string()),
                    ("compiler-version".to_string(), "3.8.1".to_string()),
                ]),
                codestarts_artifacts: vec!["g:codestarts:1".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };

        current.merge_absent(&incoming);

        let project = current.project.unwrap();
        assert_eq!(project.properties["plugin-version"], "1");
        assert_eq!(project.properties["compiler-version"], "3.8.1");
        assert_eq!(project.codestarts_artifacts, vec!["g:codestarts:1"]);
        assert_eq!(current.platform_release.unwrap().stream, "2.7");
    }

    #[test]
    fn test_catalog_metadata_json_shape() {
        let md: CatalogMetadata = serde_json::from_value(json!({
            "platform-release": {
                "platform-key": "io.quarkus.platform",
                "stream": "2.7",
                "version": "2.7.1",
                "members": ["io.quarkus.platform:quarkus-bom-quarkus-platform-descriptor:2.7.1:json:2.7.1"]
            },
            "custom": {"a": 1}
        }))
        .unwrap();

        let release = md.platform_release.as_ref().unwrap();
        assert_eq!(release.members.len(), 1);
        assert_eq!(md.other["custom"], json!({"a": 1}));
        assert!(!md.is_empty());
    }
}
