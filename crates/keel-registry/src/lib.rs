//! # keel-registry
//!
//! Extension registries and catalog resolution for Keel:
//! - Registry clients reading descriptors from Maven repositories
//! - Per-registry recognition of quarkus-core versions and platform BOMs
//! - Multi-registry resolution with origin preferences
//! - Extension and platform catalog merging
//! - Extension selection by pattern

pub mod arena;
pub mod client;
pub mod error;
pub mod maven;
pub mod merge;
pub mod registry_resolver;
pub mod resolver;
pub mod selection;

pub use client::{RegistryClient, RegistryClientFactory};
pub use error::{RegistryError, Result};
pub use maven::{
    ArtifactResolver, LocalRepository, MavenRegistryClient, MavenRegistryClientFactory,
    RemoteRepository,
};
pub use merge::{merge_catalogs, merge_platform_catalogs};
pub use registry_resolver::{Recognition, RegistryExtensionResolver};
pub use resolver::{ExtensionCatalogResolver, ExtensionCatalogResolverBuilder};
pub use selection::{search, select, Selection};
