//! Mock implementations for testing
//!
//! Provides an in-memory registry client so resolution can be tested
//! without a Maven repository or network access.

#![allow(dead_code)]

use keel_core::types::{ArtifactCoords, ExtensionCatalog, PlatformCatalog};
use keel_registry::{RegistryClient, RegistryError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    /// Catalog returned for unversioned requests and versions without their own entry
    platforms: Option<PlatformCatalog>,
    versioned_platforms: HashMap<String, PlatformCatalog>,
    members: HashMap<ArtifactCoords, ExtensionCatalog>,
    non_platform: HashMap<String, ExtensionCatalog>,
    fail_platforms: bool,
    fail_clear: bool,
    calls: Vec<String>,
}

/// In-memory registry client; clones share state
#[derive(Clone, Default)]
pub struct MockRegistryClient {
    state: Arc<Mutex<MockState>>,
}

impl MockRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platforms(self, catalog: PlatformCatalog) -> Self {
        self.state.lock().unwrap().platforms = Some(catalog);
        self
    }

    /// Platform catalog answered only for `version`
    pub fn with_platforms_for(self, version: &str, catalog: PlatformCatalog) -> Self {
        self.state
            .lock()
            .unwrap()
            .versioned_platforms
            .insert(version.to_string(), catalog);
        self
    }

    /// Member catalog, served for the BOM it declares
    pub fn with_member(self, catalog: ExtensionCatalog) -> Self {
        let bom = catalog
            .bom
            .clone()
            .expect("member catalog fixture needs a bom");
        self.state
            .lock()
            .unwrap()
            .members
            .insert(bom.catalog_artifact(), catalog);
        self
    }

    pub fn with_non_platform(self, version: &str, catalog: ExtensionCatalog) -> Self {
        self.state
            .lock()
            .unwrap()
            .non_platform
            .insert(version.to_string(), catalog);
        self
    }

    pub fn failing_platforms(self) -> Self {
        self.state.lock().unwrap().fail_platforms = true;
        self
    }

    pub fn failing_clear(self) -> Self {
        self.state.lock().unwrap().fail_clear = true;
        self
    }

    /// Recorded calls, e.g. `platforms:2.7.1`, `member:g:a:pom:1`, `clear`
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl RegistryClient for MockRegistryClient {
    fn resolve_platforms(&self, quarkus_version: Option<&str>) -> Result<Option<PlatformCatalog>> {
        self.record(format!("platforms:{}", quarkus_version.unwrap_or("*")));
        let state = self.state.lock().unwrap();
        if state.fail_platforms {
            return Err(RegistryError::download("mock://platforms", "connection refused"));
        }
        let versioned = quarkus_version.and_then(|v| state.versioned_platforms.get(v));
        Ok(versioned.or(state.platforms.as_ref()).cloned())
    }

    fn resolve_platform_extensions(&self, bom: &ArtifactCoords) -> Result<ExtensionCatalog> {
        self.record(format!("member:{}", bom));
        self.state
            .lock()
            .unwrap()
            .members
            .get(&bom.catalog_artifact())
            .cloned()
            .ok_or_else(|| RegistryError::artifact_not_found(bom))
    }

    fn resolve_non_platform_extensions(
        &self,
        quarkus_version: &str,
    ) -> Result<Option<ExtensionCatalog>> {
        self.record(format!("non-platform:{}", quarkus_version));
        Ok(self
            .state
            .lock()
            .unwrap()
            .non_platform
            .get(quarkus_version)
            .cloned())
    }

    fn clear_cache(&self) -> Result<()> {
        self.record("clear".to_string());
        if self.state.lock().unwrap().fail_clear {
            return Err(RegistryError::Io(std::io::Error::other("cache locked")));
        }
        Ok(())
    }
}
