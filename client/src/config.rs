//! Layered configuration: built-in defaults, an optional file, then
//! `ABITUS_*` environment variables (`__` separates nested keys, e.g.
//! `ABITUS_IMGBB__API_KEY`).

use std::fmt;
use std::path::Path;

use abitus_core::{DEFAULT_BASE_URL, DEFAULT_UPLOAD_URL};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AbitusConfig {
    pub api: ApiSettings,
    pub imgbb: ImgbbSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
}

#[derive(Deserialize, Clone)]
pub struct ImgbbSettings {
    pub upload_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl fmt::Debug for ImgbbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImgbbSettings")
            .field("upload_url", &self.upload_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ImgbbSettings {
    /// The configured key, or a `NotFound` error naming the missing setting.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::NotFound("imgbb.api_key".to_string()))
    }
}

impl AbitusConfig {
    /// Defaults overridden by the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder(None)?.build()?.try_deserialize()
    }

    /// Defaults, then `path` (format picked from its extension), then the
    /// environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::builder(Some(path))?.build()?.try_deserialize()
    }

    fn builder(path: Option<&Path>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("imgbb.upload_url", DEFAULT_UPLOAD_URL)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        Ok(builder.add_source(
            Environment::with_prefix("ABITUS")
                .prefix_separator("_")
                .separator("__"),
        ))
    }
}
