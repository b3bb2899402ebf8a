use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_folder: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl CloudinaryConfig {
    /// Parses `cloudinary://<api_key>:<api_secret>@<cloud_name>`.
    pub fn from_url(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            key: "CLOUDINARY_URL",
            reason: reason.to_string(),
        };

        let url = Url::parse(raw).map_err(|err| invalid(&err.to_string()))?;
        if url.scheme() != "cloudinary" {
            return Err(invalid("scheme must be cloudinary://"));
        }

        let cloud_name = url.host_str().filter(|h| !h.is_empty()).ok_or_else(|| invalid("missing cloud name"))?;
        let api_key = Some(url.username()).filter(|k| !k.is_empty()).ok_or_else(|| invalid("missing api key"))?;
        let api_secret = url.password().filter(|s| !s.is_empty()).ok_or_else(|| invalid("missing api secret"))?;

        Ok(Self::new(cloud_name, api_key, api_secret))
    }

    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            upload_folder: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let mut config = match optional("CLOUDINARY_URL") {
            Some(raw) => Self::from_url(&raw)?,
            None => Self::new(
                &required("CLOUDINARY_CLOUD_NAME")?,
                &required("CLOUDINARY_API_KEY")?,
                &required("CLOUDINARY_API_SECRET")?,
            ),
        };

        config.upload_folder = optional("CLOUDINARY_UPLOAD_FOLDER");
        if let Some(api_base) = optional("CLOUDINARY_API_BASE") {
            config.api_base = api_base.trim_end_matches('/').to_string();
        }
        if let Some(secs) = optional("CLOUDINARY_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|err| ConfigError::Invalid {
                key: "CLOUDINARY_TIMEOUT_SECS",
                reason: err.to_string(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cloudinary: CloudinaryConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_max_connections = match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|err| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                reason: err.to_string(),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            bind_address: optional("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            cloudinary: CloudinaryConfig::from_env()?,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    let value = env::var(key).map_err(|_| ConfigError::Missing(key))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(key));
    }
    Ok(value)
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
