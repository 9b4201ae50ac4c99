//! Configuration management for the barcode label server
//!
//! Everything is read from the process environment once at startup
//! (optionally seeded from a `.env` file) and never changes afterwards.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Longest lifetime S3 SigV4 accepts for a presigned URL: 7 days
pub const MAX_SIGNED_URL_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Signed URL lifetime used when nothing is configured: 3 days
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3 * 24 * 60 * 60;

/// Default local artifact directory, under the OS temp dir
pub const LOCAL_ARTIFACT_SUBDIR: &str = "barcode-labels";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub publish: PublishConfig,
    pub label: LabelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub signed_url_ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// Durable object storage with presigned download URLs
    S3,
    /// Local directory, served back through `/files`
    Local,
}

impl PublishMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishMode::S3 => "s3",
            PublishMode::Local => "local",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    pub mode: PublishMode,
    pub local_dir: PathBuf,
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelConfig {
    pub caption: bool,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Unknown publish mode: {0} (expected \"s3\" or \"local\")")]
    UnknownPublishMode(String),

    #[error("Signed URL TTL of {0}s exceeds the 7 day maximum")]
    TtlTooLong(u64),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                endpoint: "https://storage.yandexcloud.net".to_string(),
                bucket: "packagebc".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                region: "ru-central1".to_string(),
                signed_url_ttl_secs: DEFAULT_SIGNED_URL_TTL_SECS,
            },
            publish: PublishConfig {
                mode: PublishMode::S3,
                local_dir: env::temp_dir().join(LOCAL_ARTIFACT_SUBDIR),
                public_base_url: None,
            },
            label: LabelConfig { caption: true },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Unset variables take their defaults; set but unparseable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |name: &str, default: String| lookup(name).unwrap_or(default);

        let port = parse_var(&lookup, "SERVER_PORT", defaults.server.port)?;

        let signed_url_ttl_secs = parse_var(
            &lookup,
            "SIGNED_URL_TTL_SECS",
            defaults.storage.signed_url_ttl_secs,
        )?;
        if signed_url_ttl_secs > MAX_SIGNED_URL_TTL_SECS {
            return Err(ConfigError::TtlTooLong(signed_url_ttl_secs));
        }

        let mode = match lookup("PUBLISH_MODE").map(|m| m.trim().to_lowercase()) {
            None => defaults.publish.mode,
            Some(m) if m == "s3" => PublishMode::S3,
            Some(m) if m == "local" => PublishMode::Local,
            Some(other) => return Err(ConfigError::UnknownPublishMode(other)),
        };

        let caption = parse_bool(&lookup, "LABEL_CAPTION", defaults.label.caption)?;

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST", defaults.server.host),
                port,
            },
            storage: StorageConfig {
                endpoint: var("AWS_ENDPOINT", defaults.storage.endpoint),
                bucket: var("AWS_BUCKET_NAME", defaults.storage.bucket),
                access_key: var("AWS_ACCESS_KEY_ID", defaults.storage.access_key),
                secret_key: var("AWS_SECRET_ACCESS_KEY", defaults.storage.secret_key),
                region: var("AWS_REGION", defaults.storage.region),
                signed_url_ttl_secs,
            },
            publish: PublishConfig {
                mode,
                local_dir: lookup("LOCAL_ARTIFACT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.publish.local_dir),
                public_base_url: lookup("PUBLIC_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .filter(|u| !u.is_empty()),
            },
            label: LabelConfig { caption },
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

fn parse_bool<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { name, value }),
        },
    }
}
