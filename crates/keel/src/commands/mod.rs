//! CLI command implementations

pub mod extension;
pub mod platform;
pub mod registry;

use anyhow::{Context, Result};
use keel_core::RegistriesConfig;
use keel_registry::ExtensionCatalogResolver;

/// Resolver over the enabled registries of `config`
pub(crate) fn build_resolver(config: &RegistriesConfig) -> Result<ExtensionCatalogResolver> {
    ExtensionCatalogResolver::builder()
        .config(config.clone())
        .build()
        .context("Failed to initialize registry clients")
}
