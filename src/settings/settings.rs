use crate::domain_model::{KeyPrefix, RefreshFailurePolicy, RefreshMode, TokenStoreConfig};
use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log: Log,
    pub store: Store,
    pub redis: Redis,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "redis"
    pub prefix: KeyPrefix,
    #[serde(default)]
    pub refresh_failure: RefreshFailurePolicy,
    #[serde(default)]
    pub refresh_mode: RefreshMode,
}

impl Store {
    pub fn token_store_config(&self) -> TokenStoreConfig {
        TokenStoreConfig::new(self.prefix.clone())
            .on_refresh_failure(self.refresh_failure)
            .refresh_mode(self.refresh_mode)
    }
}

#[derive(Debug, Deserialize)]
pub struct Redis {
    pub dsn: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Environment overrides look like `TOKENSTORE__STORE__BACKEND=redis`.
const ENV_PREFIX: &str = "TOKENSTORE";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
