//! Configuration loader
//!
//! Merges, in increasing priority: built-in defaults, a TOML file and
//! environment variables. The same figment also backs a configuration source, so
//! per-bean settings can be given in the file or the environment.

use std::env;
use std::path::{Path, PathBuf};

use beanwire_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use super::sources::FigmentConfigSource;
use super::types::RuntimeConfig;
use crate::constants::{CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_FILENAME};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Result of a load: the typed configuration and a source over the raw values
#[derive(Debug)]
pub struct LoadedConfig {
    pub runtime: RuntimeConfig,
    pub source: FigmentConfigSource,
}

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `RuntimeConfig::default()`
    /// 2. TOML configuration file (the configured path, else `beanwire.toml` in
    ///    the working directory, if it exists)
    /// 3. Environment variables with prefix, nested keys separated by `__`
    ///    (e.g., `BEANWIRE_SERVICES__LEASE_RENEWAL_INTERVAL_MS`)
    pub fn load(&self) -> Result<LoadedConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(RuntimeConfig::default()));

        let path = self
            .config_path
            .clone()
            .or_else(|| env::current_dir().ok().map(|dir| dir.join(DEFAULT_CONFIG_FILENAME)));
        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                log_config_loaded(&path, true);
            } else if self.config_path.is_some() {
                log_config_loaded(&path, false);
            }
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let runtime: RuntimeConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;
        validate_runtime_config(&runtime)?;

        Ok(LoadedConfig {
            runtime,
            source: FigmentConfigSource::new(figment),
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &RuntimeConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate runtime configuration values
fn validate_runtime_config(config: &RuntimeConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    if config.services.lease_renewal_interval_ms == 0 {
        return Err(Error::Configuration {
            message: "Lease renewal interval cannot be 0".to_string(),
            source: None,
        });
    }
    if config.fault_tolerance.policy.trim().is_empty() {
        return Err(Error::Configuration {
            message: "Fault tolerance policy name cannot be empty".to_string(),
            source: None,
        });
    }
    Ok(())
}
