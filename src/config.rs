use crate::constants;
use crate::error::{CmsError, Result};
use crate::types::Collection;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Resolves the CMS data-source id for each content type.
///
/// `None` means the type is not configured in this deployment; fetchers treat
/// that as an empty collection rather than an error.
pub trait DataSources: Send + Sync {
    fn data_source_id(&self, collection: Collection) -> Option<String>;
}

/// Reads ids from the process environment on every call, so a changed
/// variable takes effect without a restart.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvDataSources;

impl DataSources for EnvDataSources {
    fn data_source_id(&self, collection: Collection) -> Option<String> {
        std::env::var(collection.env_var())
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    }
}

/// Fixed id table, for tests and fixture-backed runs.
#[derive(Debug, Clone, Default)]
pub struct StaticDataSources {
    ids: HashMap<Collection, String>,
}

impl StaticDataSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collection: Collection, id: impl Into<String>) -> Self {
        self.ids.insert(collection, id.into());
        self
    }

    /// Every collection configured, using its key as the data-source id.
    pub fn all() -> Self {
        Collection::ALL
            .into_iter()
            .fold(Self::new(), |sources, c| sources.with(c, c.key()))
    }
}

impl DataSources for StaticDataSources {
    fn data_source_id(&self, collection: Collection) -> Option<String> {
        self.ids.get(&collection).filter(|id| !id.is_empty()).cloned()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_HOST.to_string(),
            port: constants::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CmsConfig {
    pub api_base: String,
    pub api_version: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_base: constants::DEFAULT_API_BASE.to_string(),
            api_version: constants::DEFAULT_API_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cms: CmsConfig,
}

impl Config {
    /// Load `path` if it exists, otherwise defaults. A `PORT` variable
    /// overrides the configured port.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                CmsError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(port) = std::env::var(constants::PORT_ENV) {
            config.server.port = port
                .parse()
                .map_err(|_| CmsError::Config(format!("Invalid {} value: {}", constants::PORT_ENV, port)))?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// CMS bearer token, if one is configured.
pub fn cms_token() -> Option<String> {
    std::env::var(constants::NOTION_TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty())
}
