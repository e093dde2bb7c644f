//! Registries configuration loader
//!
//! The configuration file is located with the following precedence (high to low):
//! 1. Explicit path (`--config`)
//! 2. `KEEL_CONFIG` environment variable
//! 3. Global config (~/.keel/config.yaml)
//! 4. Built-in default (the single `registry.quarkus.io` registry)
//!
//! Environment overrides (`KEEL_REGISTRIES`, `KEEL_DEBUG`) are applied last.

use super::registries::{RegistriesConfig, RegistryConfig};
use crate::error::{Error, Result};
use crate::utils::get_home_dir;
use crate::version::VersionExpression;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::env;
use std::fs;
use tracing::debug;

/// Name of the global registries configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Registries configuration loader
pub struct RegistriesConfigLoader {
    /// Directory holding the global config file
    config_dir: Utf8PathBuf,
}

impl RegistriesConfigLoader {
    /// Create a loader rooted at ~/.keel
    pub fn new() -> Result<Self> {
        let home = get_home_dir()
            .map_err(|e| Error::invalid_config(format!("Could not determine home directory: {}", e)))?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {}", p.display())))?;
        Ok(Self {
            config_dir: home.join(".keel"),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Path of the global config file
    pub fn default_config_path(&self) -> Utf8PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Locate, parse and validate the registries configuration
    pub fn load(&self, explicit: Option<&Utf8Path>) -> Result<RegistriesConfig> {
        let requested = explicit
            .map(Utf8Path::to_path_buf)
            .or_else(|| env::var("KEEL_CONFIG").ok().map(Utf8PathBuf::from));

        let mut config = match requested {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::config_not_found(path.as_str()));
                }
                self.load_file(&path)?
            }
            None => {
                let path = self.default_config_path();
                if path.exists() {
                    self.load_file(&path)?
                } else {
                    debug!("No registries config at {}, using defaults", path);
                    RegistriesConfig::default()
                }
            }
        };

        config = Self::apply_env_overrides(config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Parse a config file
    pub fn load_file(&self, path: &Utf8Path) -> Result<RegistriesConfig> {
        let content = fs::read_to_string(path)?;
        let mut config: RegistriesConfig = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;
        if config.registries.is_empty() {
            config.registries = RegistriesConfig::default().registries;
        }
        config.source = Some(path.to_path_buf());
        debug!(
            "Loaded {} registries from {}",
            config.registries.len(),
            path
        );
        Ok(config)
    }

    /// Write a config to `path`, or to the file it was loaded from, or to the global config
    pub fn save(&self, config: &RegistriesConfig, path: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
        let target = path
            .map(Utf8Path::to_path_buf)
            .or_else(|| config.source.clone())
            .unwrap_or_else(|| self.default_config_path());
        if let Some(parent) = target.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&target, serde_yaml_ng::to_string(config)?)?;
        Ok(target)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: RegistriesConfig) -> RegistriesConfig {
        // Comma separated ids; configured options are kept for ids already known
        if let Ok(val) = env::var("KEEL_REGISTRIES") {
            let registries: Vec<RegistryConfig> = val
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| {
                    config
                        .registry(id)
                        .cloned()
                        .unwrap_or_else(|| RegistryConfig::new(id))
                })
                .collect();
            if !registries.is_empty() {
                debug!("Registries overridden by KEEL_REGISTRIES: {}", val);
                config.registries = registries;
            }
        }

        if let Ok(val) = env::var("KEEL_DEBUG") {
            config.debug = val.parse().unwrap_or(false);
        }

        config
    }

    fn validate(config: &RegistriesConfig) -> Result<()> {
        let mut seen = HashSet::new();
        for registry in &config.registries {
            if registry.id.trim().is_empty() {
                return Err(Error::invalid_config("Registry id must not be empty"));
            }
            if !seen.insert(registry.id.as_str()) {
                return Err(Error::invalid_config(format!(
                    "Registry {} is configured more than once",
                    registry.id
                )));
            }
            if let Some(expr) = registry
                .quarkus_versions
                .as_ref()
                .and_then(|v| v.recognized_versions_expression.as_deref())
            {
                VersionExpression::parse(expr)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REGISTRY_ID;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_temp_loader() -> (RegistriesConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        (RegistriesConfigLoader::with_dir(config_dir), temp_dir)
    }

    fn clear_env() {
        env::remove_var("KEEL_CONFIG");
        env::remove_var("KEEL_REGISTRIES");
        env::remove_var("KEEL_DEBUG");
    }

    #[test]
    #[serial]
    fn test_missing_config_yields_default_registry() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let config = loader.load(None).unwrap();
        assert_eq!(config.registries.len(), 1);
        assert_eq!(config.registries[0].id, DEFAULT_REGISTRY_ID);
        assert!(config.source.is_none());
    }

    #[test]
    #[serial]
    fn test_load_global_config() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.default_config_path(),
            "registries:\n  - registry.example.org\n  - registry.quarkus.io\n",
        )
        .unwrap();

        let config = loader.load(None).unwrap();
        let ids: Vec<_> = config.registries.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["registry.example.org", "registry.quarkus.io"]);
        assert_eq!(config.source, Some(loader.default_config_path()));
    }

    #[test]
    #[serial]
    fn test_explicit_path_must_exist() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let missing = loader.config_dir().join("nope.yaml");
        let err = loader.load(Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_env_config_path() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let path = loader.config_dir().join("custom.yaml");
        fs::write(&path, "registries:\n  - env.example.org\n").unwrap();
        env::set_var("KEEL_CONFIG", path.as_str());

        let config = loader.load(None).unwrap();
        assert_eq!(config.registries[0].id, "env.example.org");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_registries_env_override_keeps_known_options() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.default_config_path(),
            r#"
registries:
  - registry.example.org:
      offering: supported
  - registry.quarkus.io
"#,
        )
        .unwrap();
        env::set_var("KEEL_REGISTRIES", "other.example.org, registry.example.org");
        env::set_var("KEEL_DEBUG", "true");

        let config = loader.load(None).unwrap();
        let ids: Vec<_> = config.registries.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["other.example.org", "registry.example.org"]);
        assert_eq!(config.registries[1].offering.as_deref(), Some("supported"));
        assert!(config.debug);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_duplicate_registry_rejected() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.default_config_path(),
            "registries:\n  - a.example.org\n  - a.example.org\n",
        )
        .unwrap();
        assert!(loader.load(None).is_err());
    }

    #[test]
    #[serial]
    fn test_invalid_version_expression_rejected() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.default_config_path(),
            r#"
registries:
  - a.example.org:
      quarkus-versions:
        recognized-versions-expression: "{2,3"
"#,
        )
        .unwrap();
        let err = loader.load(None).unwrap_err();
        assert!(matches!(err, Error::InvalidVersionExpression { .. }));
    }

    #[test]
    #[serial]
    fn test_save_and_reload() {
        clear_env();
        let (loader, _temp) = create_temp_loader();
        let mut config = RegistriesConfig::default();
        config.registries.push(RegistryConfig::new("registry.example.org"));

        let path = loader.save(&config, None).unwrap();
        assert_eq!(path, loader.default_config_path());

        let loaded = loader.load(None).unwrap();
        assert_eq!(loaded.registries, config.registries);
    }
}
