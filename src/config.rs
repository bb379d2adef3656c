//! Service configuration.
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `VIRT_PROFILES_*` environment variables. The daemon's CLI flags override
//! all of these.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::logging::LoggingConfig;
use crate::merge::ConflictPolicy;

/// Root configuration for the virt-profiles daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Interface to listen on
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the profile catalogue
    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: PathBuf,

    /// Whether presets are ordered by priority before merging
    #[serde(default = "default_true")]
    pub sort_presets: bool,

    /// What to do when presets disagree: "warn" or "fail"
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_profiles_dir() -> PathBuf {
    PathBuf::from("/usr/share/virt-profiles")
}

fn default_true() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            profiles_dir: default_profiles_dir(),
            sort_presets: true,
            conflict_policy: ConflictPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Create a Config builder with service defaults applied.
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("host", "127.0.0.1")?
        .set_default("port", 8080)?
        .set_default("profiles_dir", "/usr/share/virt-profiles")?
        .set_default("sort_presets", true)?
        .set_default("conflict_policy", "warn")
}

impl ServiceConfig {
    /// Load configuration from defaults, an optional file, and the
    /// environment, then validate it.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SetupError> {
        let mut builder = builder_with_defaults()?;
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("VIRT_PROFILES")
                .separator("__")
                .try_parsing(true),
        );

        let config: ServiceConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.host.is_empty() {
            return Err(SetupError::InvalidConfig("host cannot be empty".to_string()));
        }
        if self.profiles_dir.as_os_str().is_empty() {
            return Err(SetupError::InvalidConfig(
                "profiles directory cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
