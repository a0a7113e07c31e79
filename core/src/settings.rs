//! Client configuration.
//!
//! Sources, later ones overriding earlier ones:
//!
//! * built-in defaults,
//! * `dockr.toml` in the current directory, if present,
//! * the file named by `DOCKR_CONFIG`, if set,
//! * `DOCKR_*` environment variables (`DOCKR_BASE_URL`, `DOCKR_TIMEOUT_SECS`).

use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// The engine endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:2375";

/// The file name looked up in the current directory.
pub const FILE_NAME: &str = "dockr.toml";

/// The environment variable prefix.
pub const ENV_PREFIX: &str = "DOCKR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the engine API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Overall timeout per request. None waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Loads the configuration from the default sources.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(File::with_name(FILE_NAME).required(false));

        if let Ok(path) = std::env::var(format!("{ENV_PREFIX}_CONFIG")) {
            builder = builder.add_source(File::with_name(&path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut config: ClientConfig = builder.build()?.try_deserialize()?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}
