use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use snafu::ResultExt;

use crate::error::{ApplicationError, ConfigLoadSnafu};
use crate::store::StoreTarget;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_REDIS_KEY: &str = "videos";

const MEMORY_SCHEME: &str = "memory://";

/// Load the configuration from the environment.
///
/// A blank `REDIS_URL` or `REDIS_KEY` resets both store settings to their defaults, see [Config::store_defaulted].
pub fn load() -> Result<Config, ApplicationError> {
    envy::from_env::<Config>()
        .context(ConfigLoadSnafu)
        .map(Config::with_store_fallback)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "host_address")]
    pub host: SocketAddr,
    pub redis_url: String,
    pub redis_key: String,
    pub log_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub shutdown_grace_secs: u64,

    /// Set when the store settings were blank and got replaced by the defaults.
    #[serde(skip)]
    pub store_defaulted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: SocketAddr::from(([0, 0, 0, 0], 8080)),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            redis_key: DEFAULT_REDIS_KEY.to_string(),
            log_dir: PathBuf::from("logs"),
            request_timeout_secs: 5,
            shutdown_grace_secs: 10,
            store_defaulted: false,
        }
    }
}

impl Config {
    fn with_store_fallback(mut self) -> Self {
        if self.redis_url.trim().is_empty() || self.redis_key.trim().is_empty() {
            self.redis_url = DEFAULT_REDIS_URL.to_string();
            self.redis_key = DEFAULT_REDIS_KEY.to_string();
            self.store_defaulted = true;
        }
        self
    }

    /// `memory://` selects the in-process store. A bare `host:port` is treated as a redis address.
    pub fn store_target(&self) -> StoreTarget {
        let url = self.redis_url.trim();

        if url.starts_with(MEMORY_SCHEME) {
            StoreTarget::Memory
        } else if url.contains("://") {
            StoreTarget::Redis(url.to_string())
        } else {
            StoreTarget::Redis(format!("redis://{url}"))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
