//! Server configuration.
//!
//! Everything is read once at startup and passed down explicitly; nothing
//! in the request path consults the environment.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use tracing::warn;

use applydiary_core::defaults::{
    CLIENT_ORIGIN, DEV_TOKEN_SECRET, MAX_UPLOAD_BYTES, SERVER_HOST, SERVER_PORT, TOKEN_TTL_SECS,
    UPLOAD_DIR,
};
use applydiary_core::{Error, Result};
use applydiary_crypto::{HashParams, TokenConfig};
use applydiary_inference::OpenAIConfig;

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("production") | Some("prod") => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub app_env: AppEnv,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub token: TokenConfig,
    /// Origins allowed by CORS.
    pub client_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// `None` when no API key is configured; follow-up drafts are then unavailable.
    pub openai: Option<OpenAIConfig>,
    pub hash_params: HashParams,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_env: AppEnv::Development,
            database_url: "postgres://localhost/applydiary".to_string(),
            host: SERVER_HOST.to_string(),
            port: SERVER_PORT,
            token: TokenConfig::with_secret(DEV_TOKEN_SECRET),
            client_origins: vec![CLIENT_ORIGIN.to_string()],
            upload_dir: PathBuf::from(UPLOAD_DIR),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            openai: None,
            hash_params: HashParams::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.openai = OpenAIConfig::from_env();
        Ok(config)
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Generation settings are not read here; see [`OpenAIConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if app_env == AppEnv::Production => {
                return Err(Error::Config(
                    "JWT_SECRET must be set when APP_ENV=production".to_string(),
                ));
            }
            None => {
                warn!(
                    subsystem = "config",
                    "JWT_SECRET not set, using the development secret"
                );
                DEV_TOKEN_SECRET.to_string()
            }
        };

        let ttl = match var("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration(&raw)
                .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
                .ok_or_else(|| Error::Config(format!("Invalid JWT_EXPIRES_IN value: {:?}", raw)))?,
            None => Duration::seconds(TOKEN_TTL_SECS),
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT value: {:?}", raw)))?,
            None => defaults.port,
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid MAX_UPLOAD_BYTES value: {:?}", raw)))?,
            None => defaults.max_upload_bytes,
        };

        let client_origins = var("CLIENT_ORIGIN")
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.client_origins);

        Ok(Self {
            app_env,
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: var("HOST").unwrap_or(defaults.host),
            port,
            token: TokenConfig::new(secret, ttl),
            client_origins,
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes,
            openai: None,
            hash_params: defaults.hash_params,
        })
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a duration such as `7d`, `12h`, `30m`, `45s`, or bare seconds.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: i64 = digits.parse().ok()?;
    if amount <= 0 {
        return None;
    }
    let seconds = match unit.trim() {
        "" | "s" => amount,
        "m" => amount.checked_mul(60)?,
        "h" => amount.checked_mul(60 * 60)?,
        "d" => amount.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };
    Duration::try_seconds(seconds)
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}
