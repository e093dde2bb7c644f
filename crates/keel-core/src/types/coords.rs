//! Artifact and stream coordinates

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default artifact type
pub const DEFAULT_TYPE: &str = "jar";

/// Suffix appended to a platform member BOM artifactId to name its JSON catalog
pub const PLATFORM_DESCRIPTOR_SUFFIX: &str = "-quarkus-platform-descriptor";

/// Full artifact coordinates
///
/// String forms (all colon separated):
/// - `groupId:artifactId:version`
/// - `groupId:artifactId:type:version`
/// - `groupId:artifactId:classifier:type:version`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactCoords {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: String,
    pub r#type: String,
    pub version: String,
}

impl ArtifactCoords {
    /// Create coordinates for a `jar` artifact without classifier
    pub fn jar(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::new(group_id, artifact_id, "", DEFAULT_TYPE, version)
    }

    /// Create coordinates for a `pom` artifact (BOM) without classifier
    pub fn pom(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::new(group_id, artifact_id, "", "pom", version)
    }

    /// Create coordinates from all five parts
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        classifier: impl Into<String>,
        r#type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: classifier.into(),
            r#type: r#type.into(),
            version: version.into(),
        }
    }

    /// Key identifying the artifact regardless of its version
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            classifier: self.classifier.clone(),
            r#type: self.r#type.clone(),
        }
    }

    /// Same artifact with a different classifier
    pub fn with_classifier(&self, classifier: impl Into<String>) -> Self {
        Self {
            classifier: classifier.into(),
            ..self.clone()
        }
    }

    /// Whether these coordinates already point at a platform JSON descriptor
    pub fn is_catalog_artifact(&self) -> bool {
        self.artifact_id.ends_with(PLATFORM_DESCRIPTOR_SUFFIX) && self.r#type == "json"
    }

    /// Coordinates of the JSON extension catalog describing a member BOM
    ///
    /// `g:a::pom:v` becomes `g:a-quarkus-platform-descriptor:v:json:v`.
    pub fn catalog_artifact(&self) -> Self {
        if self.is_catalog_artifact() {
            return self.clone();
        }
        Self::new(
            self.group_id.clone(),
            format!("{}{}", self.artifact_id, PLATFORM_DESCRIPTOR_SUFFIX),
            self.version.clone(),
            "json",
            self.version.clone(),
        )
    }

    /// Inverse of [`ArtifactCoords::catalog_artifact`]
    pub fn bom_artifact(&self) -> Self {
        if !self.is_catalog_artifact() {
            return self.clone();
        }
        let artifact_id = self
            .artifact_id
            .trim_end_matches(PLATFORM_DESCRIPTOR_SUFFIX)
            .to_string();
        Self::pom(self.group_id.clone(), artifact_id, self.version.clone())
    }
}

impl fmt::Display for ArtifactCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.classifier.is_empty() {
            if self.r#type == DEFAULT_TYPE {
                write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
            } else {
                write!(
                    f,
                    "{}:{}:{}:{}",
                    self.group_id, self.artifact_id, self.r#type, self.version
                )
            }
        } else {
            write!(
                f,
                "{}:{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.classifier, self.r#type, self.version
            )
        }
    }
}

impl FromStr for ArtifactCoords {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let coords = match parts.as_slice() {
            [g, a, v] => Self::new(*g, *a, "", DEFAULT_TYPE, *v),
            [g, a, t, v] => Self::new(*g, *a, "", *t, *v),
            [g, a, c, t, v] => {
                let t = if t.is_empty() { DEFAULT_TYPE } else { t };
                Self::new(*g, *a, *c, t, *v)
            }
            _ => {
                return Err(Error::invalid_coords(
                    s,
                    "expected groupId:artifactId[:classifier[:type]]:version",
                ))
            }
        };

        if coords.group_id.is_empty() || coords.artifact_id.is_empty() {
            return Err(Error::invalid_coords(s, "groupId and artifactId are required"));
        }
        if coords.version.is_empty() {
            return Err(Error::invalid_coords(s, "version is required"));
        }
        Ok(coords)
    }
}

impl TryFrom<String> for ArtifactCoords {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ArtifactCoords> for String {
    fn from(value: ArtifactCoords) -> Self {
        value.to_string()
    }
}

/// Version-less artifact identity used as the extension dedup key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactKey {
    pub group_id: String,
    pub artifact_id: String,
    pub classifier: String,
    pub r#type: String,
}

impl ArtifactKey {
    /// Key of a `jar` artifact without classifier
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: String::new(),
            r#type: DEFAULT_TYPE.to_string(),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if !self.classifier.is_empty() || self.r#type != DEFAULT_TYPE {
            write!(f, ":{}:{}", self.classifier, self.r#type)?;
        }
        Ok(())
    }
}

impl FromStr for ArtifactKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let key = match parts.as_slice() {
            [g, a] => Self::new(*g, *a),
            [g, a, c, t] => Self {
                group_id: g.to_string(),
                artifact_id: a.to_string(),
                classifier: c.to_string(),
                r#type: if t.is_empty() { DEFAULT_TYPE } else { t }.to_string(),
            },
            _ => {
                return Err(Error::invalid_coords(
                    s,
                    "expected groupId:artifactId[:classifier:type]",
                ))
            }
        };
        if key.group_id.is_empty() || key.artifact_id.is_empty() {
            return Err(Error::invalid_coords(s, "groupId and artifactId are required"));
        }
        Ok(key)
    }
}

impl TryFrom<String> for ArtifactKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ArtifactKey> for String {
    fn from(value: ArtifactKey) -> Self {
        value.to_string()
    }
}

/// Platform stream coordinates: `platformKey:streamId` or just `streamId`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamCoords {
    pub platform_key: Option<String>,
    pub stream_id: String,
}

impl StreamCoords {
    pub fn new(platform_key: Option<String>, stream_id: impl Into<String>) -> Self {
        Self {
            platform_key,
            stream_id: stream_id.into(),
        }
    }
}

impl fmt::Display for StreamCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.platform_key {
            Some(key) => write!(f, "{}:{}", key, self.stream_id),
            None => f.write_str(&self.stream_id),
        }
    }
}

impl FromStr for StreamCoords {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.rsplit_once(':') {
            Some((key, stream)) if !key.is_empty() && !stream.is_empty() => {
                Ok(Self::new(Some(key.to_string()), stream))
            }
            Some(_) => Err(Error::invalid_stream(s)),
            None if s.is_empty() => Err(Error::invalid_stream(s)),
            None => Ok(Self::new(None, s)),
        }
    }
}
