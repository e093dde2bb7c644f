//! Maven repository backed registry client
//!
//! Registry descriptors are JSON artifacts stored with the Maven repository
//! layout (`group/path/artifact/version/artifact-version[-classifier].type`).
//! A registry whose repository URL uses the `file://` scheme is read in
//! place; any other URL is fetched over HTTP into a local cache that mirrors
//! the same layout.

use crate::client::{RegistryClient, RegistryClientFactory};
use crate::error::{RegistryError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use keel_core::config::RegistryConfig;
use keel_core::get_home_dir;
use keel_core::types::{ArtifactCoords, ExtensionCatalog, PlatformCatalog};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of an artifact relative to a repository root
pub fn artifact_path(coords: &ArtifactCoords) -> Utf8PathBuf {
    let mut file_name = format!("{}-{}", coords.artifact_id, coords.version);
    if !coords.classifier.is_empty() {
        file_name.push('-');
        file_name.push_str(&coords.classifier);
    }
    file_name.push('.');
    file_name.push_str(&coords.r#type);

    let mut path = Utf8PathBuf::new();
    for segment in coords.group_id.split('.') {
        path.push(segment);
    }
    path.push(&coords.artifact_id);
    path.push(&coords.version);
    path.push(file_name);
    path
}

/// Resolves artifacts to local files
pub trait ArtifactResolver: Send + Sync {
    fn resolve(&self, coords: &ArtifactCoords) -> Result<Utf8PathBuf>;

    /// Forget any local copy so the next resolve fetches it again
    fn invalidate(&self, coords: &ArtifactCoords) -> Result<()>;
}

/// Repository on the local filesystem
pub struct LocalRepository {
    root: Utf8PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl ArtifactResolver for LocalRepository {
    fn resolve(&self, coords: &ArtifactCoords) -> Result<Utf8PathBuf> {
        let path = self.root.join(artifact_path(coords));
        if path.is_file() {
            Ok(path)
        } else {
            Err(RegistryError::artifact_not_found(coords))
        }
    }

    fn invalidate(&self, _coords: &ArtifactCoords) -> Result<()> {
        Ok(())
    }
}

/// Remote HTTP repository with a local download cache
pub struct RemoteRepository {
    base_url: String,
    cache_dir: Utf8PathBuf,
    client: Client,
}

impl RemoteRepository {
    pub fn new(base_url: impl Into<String>, cache_dir: impl Into<Utf8PathBuf>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("keel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegistryError::download(&base_url, e.to_string()))?;
        Ok(Self {
            base_url,
            cache_dir: cache_dir.into(),
            client,
        })
    }

    fn url(&self, coords: &ArtifactCoords) -> String {
        format!("{}/{}", self.base_url, artifact_path(coords))
    }

    fn download(&self, coords: &ArtifactCoords, target: &Utf8Path) -> Result<()> {
        let url = self.url(coords);
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| RegistryError::download(&url, e.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(RegistryError::artifact_not_found(coords)),
            status if !status.is_success() => {
                return Err(RegistryError::download(&url, format!("HTTP {}", status)))
            }
            _ => {}
        }
        let bytes = response
            .bytes()
            .map_err(|e| RegistryError::download(&url, e.to_string()))?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, &bytes)?;
        Ok(())
    }
}

impl ArtifactResolver for RemoteRepository {
    fn resolve(&self, coords: &ArtifactCoords) -> Result<Utf8PathBuf> {
        let cached = self.cache_dir.join(artifact_path(coords));
        if cached.is_file() {
            debug!("Using cached {}", coords);
            return Ok(cached);
        }
        self.download(coords, &cached)?;
        Ok(cached)
    }

    fn invalidate(&self, coords: &ArtifactCoords) -> Result<()> {
        let cached = self.cache_dir.join(artifact_path(coords));
        if cached.exists() {
            fs::remove_file(&cached)?;
        }
        Ok(())
    }
}

/// Registry client reading descriptors through an [`ArtifactResolver`]
pub struct MavenRegistryClient {
    config: RegistryConfig,
    resolver: Box<dyn ArtifactResolver>,
    platforms: Mutex<HashMap<Option<String>, Option<PlatformCatalog>>>,
    member_catalogs: Mutex<HashMap<ArtifactCoords, ExtensionCatalog>>,
    non_platform: Mutex<HashMap<String, Option<ExtensionCatalog>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MavenRegistryClient {
    pub fn new(config: RegistryConfig, resolver: Box<dyn ArtifactResolver>) -> Self {
        Self {
            config,
            resolver,
            platforms: Mutex::new(HashMap::new()),
            member_catalogs: Mutex::new(HashMap::new()),
            non_platform: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn platforms_coords(&self, quarkus_version: Option<&str>) -> ArtifactCoords {
        let coords = self.config.platforms_artifact();
        match quarkus_version {
            Some(version) => coords.with_classifier(version),
            None => coords,
        }
    }

    fn non_platform_coords(&self, quarkus_version: &str) -> ArtifactCoords {
        self.config
            .non_platform_artifact()
            .with_classifier(quarkus_version)
    }

    fn read_json<T: DeserializeOwned>(&self, coords: &ArtifactCoords) -> Result<T> {
        let path = self.resolver.resolve(coords)?;
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| RegistryError::json(coords.to_string(), e))
    }

    /// Like `read_json`, mapping a missing artifact to `None`
    fn read_optional_json<T: DeserializeOwned>(&self, coords: &ArtifactCoords) -> Result<Option<T>> {
        match self.read_json(coords) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => {
                debug!("Registry {} does not provide {}", self.config.id, coords);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl RegistryClient for MavenRegistryClient {
    fn resolve_platforms(&self, quarkus_version: Option<&str>) -> Result<Option<PlatformCatalog>> {
        if self.config.platforms.disabled {
            return Ok(None);
        }
        let key = quarkus_version.map(str::to_string);
        if let Some(cached) = locked(&self.platforms).get(&key) {
            return Ok(cached.clone());
        }

        let catalog = self.read_optional_json(&self.platforms_coords(quarkus_version))?;
        locked(&self.platforms).insert(key, catalog.clone());
        Ok(catalog)
    }

    fn resolve_platform_extensions(&self, bom: &ArtifactCoords) -> Result<ExtensionCatalog> {
        let coords = bom.catalog_artifact();
        if let Some(cached) = locked(&self.member_catalogs).get(&coords) {
            return Ok(cached.clone());
        }

        let catalog: ExtensionCatalog = self.read_json(&coords)?;
        locked(&self.member_catalogs).insert(coords, catalog.clone());
        Ok(catalog)
    }

    fn resolve_non_platform_extensions(
        &self,
        quarkus_version: &str,
    ) -> Result<Option<ExtensionCatalog>> {
        if self.config.non_platform_extensions.disabled {
            return Ok(None);
        }
        if let Some(cached) = locked(&self.non_platform).get(quarkus_version) {
            return Ok(cached.clone());
        }

        let catalog = self.read_optional_json(&self.non_platform_coords(quarkus_version))?;
        locked(&self.non_platform).insert(quarkus_version.to_string(), catalog.clone());
        Ok(catalog)
    }

    fn clear_cache(&self) -> Result<()> {
        // Member catalogs are versioned releases; only the snapshot descriptors go stale
        let platform_versions: Vec<Option<String>> =
            locked(&self.platforms).drain().map(|(k, _)| k).collect();
        let non_platform_versions: Vec<String> =
            locked(&self.non_platform).drain().map(|(k, _)| k).collect();
        locked(&self.member_catalogs).clear();

        self.resolver.invalidate(&self.platforms_coords(None))?;
        for version in platform_versions.iter().flatten() {
            self.resolver
                .invalidate(&self.platforms_coords(Some(version)))?;
        }
        for version in &non_platform_versions {
            self.resolver
                .invalidate(&self.non_platform_coords(version))?;
        }
        info!("Cleared cache of registry {}", self.config.id);
        Ok(())
    }
}

/// Builds [`MavenRegistryClient`]s with one download cache per registry
pub struct MavenRegistryClientFactory {
    cache_dir: Utf8PathBuf,
}

impl MavenRegistryClientFactory {
    pub fn new(cache_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// ~/.keel/registry-cache
    pub fn default_cache_dir() -> Result<Utf8PathBuf> {
        let home = get_home_dir()
            .map_err(|e| keel_core::Error::invalid_config(e.to_string()))?;
        let home = Utf8PathBuf::from_path_buf(home).map_err(|p| {
            keel_core::Error::invalid_config(format!(
                "Home directory is not UTF-8: {}",
                p.display()
            ))
        })?;
        Ok(home.join(".keel").join("registry-cache"))
    }

    pub fn cache_dir(&self) -> &Utf8Path {
        &self.cache_dir
    }
}

impl RegistryClientFactory for MavenRegistryClientFactory {
    fn build_client(&self, config: &RegistryConfig) -> Result<Box<dyn RegistryClient>> {
        let url = config.repository_url();
        let resolver: Box<dyn ArtifactResolver> = match url.strip_prefix("file://") {
            Some(path) => Box::new(LocalRepository::new(path)),
            None => Box::new(RemoteRepository::new(
                url.as_str(),
                self.cache_dir.join(&config.id),
            )?),
        };
        debug!("Registry {} served from {}", config.id, url);
        Ok(Box::new(MavenRegistryClient::new(config.clone(), resolver)))
    }
}
