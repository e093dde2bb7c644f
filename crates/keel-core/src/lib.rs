//! # keel-core
//!
//! Core library for the Keel CLI providing:
//! - The extension / platform catalog data model and its JSON form
//! - Typed catalog metadata with put-if-absent merging
//! - Registries configuration (config.yaml) loading
//! - Version ordering and recognized-version expressions

pub mod config;
pub mod error;
pub mod types;
pub mod utils;
pub mod version;

pub use config::{RegistriesConfig, RegistriesConfigLoader, RegistryConfig};
pub use error::{Error, Result};
pub use utils::get_home_dir;
