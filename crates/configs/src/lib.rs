//! # configs
//!
//! Layered settings: `.env` (via dotenvy), then an optional
//! `config/default.toml`, then `WHITEBOARD__SECTION__KEY` environment
//! variables. Secrets are wrapped in `SecretString` so they never show up in
//! `Debug` output.

use config::{Config, Environment, File, FileFormat};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// Snapshot file for the file-backed store. In-memory only when unset.
    #[serde(default)]
    pub data_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    #[serde(default)]
    pub issuer: Option<String>,
    /// Reject callers that have no `users/{subject}` profile record.
    #[serde(default = "default_true")]
    pub require_profile: bool,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Cookies searched for a token, in order, before the Authorization header.
    #[serde(default = "default_cookie_names")]
    pub cookie_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_login_path() -> String {
    "/auth/login".into()
}

fn default_cookie_names() -> Vec<String> {
    vec!["authToken".into(), "idToken".into()]
}

fn default_log_level() -> String {
    "info".into()
}

impl Settings {
    /// Loads settings from `.env`, `config/default.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::Invalid(format!(".env: {e}"))),
        }

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("WHITEBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.cookie_names")
                    .try_parsing(true),
            )
            .build()?;
        Self::from_config(config)
    }

    /// Parses settings from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid("auth.jwt_secret must not be empty".into()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if !self.auth.login_path.starts_with('/') {
            return Err(ConfigError::Invalid("auth.login_path must start with '/'".into()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
