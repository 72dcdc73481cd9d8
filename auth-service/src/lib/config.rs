use std::env;
use std::fmt;

use auth::Authenticator;
use auth::JwtError;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenSettings;
use auth::TokenSigner;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::Map;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::session::workers::PasswordWorkers;

/// Issuer shared by both token classes.
pub const TOKEN_ISSUER: &str = "restaurants-api";

/// Audience shared by both token classes.
pub const TOKEN_AUDIENCE: &str = "restaurants-api-clients";

/// Longest accepted token lifetime: ten years, in seconds.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Environment variables read into the configuration. Anything else in the
/// process environment is ignored.
const ENVIRONMENT_KEYS: &[&str] = &[
    "ACCESS_TOKEN_SECRET",
    "REFRESH_TOKEN_SECRET",
    "ACCESS_TOKEN_TTL",
    "REFRESH_TOKEN_TTL",
    "PASSWORD_SALT_ROUNDS",
    "PASSWORD_HASH_WORKERS",
    "SERVER__HTTP_PORT",
    "DATABASE__URL",
    "DATABASE__MAX_CONNECTIONS",
];

#[derive(Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    /// Seconds.
    pub access_token_ttl: i64,
    /// Seconds.
    pub refresh_token_ttl: i64,
    pub password_salt_rounds: Option<u32>,
    pub password_hash_workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid token configuration: {0}")]
    Token(#[from] JwtError),

    #[error("Invalid password configuration: {0}")]
    Password(#[from] PasswordError),

    #[error("{0} must be a positive number of seconds, at most ten years")]
    TtlOutOfRange(&'static str),
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (ACCESS_TOKEN_SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::load_from(&run_mode, env::vars())
    }

    /// Load configuration for `run_mode`, taking overrides from `vars`.
    ///
    /// Only the keys in [`ENVIRONMENT_KEYS`] are picked up.
    pub fn load_from<I>(run_mode: &str, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let recognised: Map<String, String> = vars
            .into_iter()
            .filter(|(key, _)| ENVIRONMENT_KEYS.contains(&key.as_str()))
            .collect();

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Flat keys map directly (ACCESS_TOKEN_TTL -> access_token_ttl),
            // nested ones use __ (DATABASE__URL -> database.url)
            .add_source(
                Environment::default()
                    .separator("__")
                    .source(Some(recognised)),
            )
            .build()?;

        configuration.try_deserialize()
    }

    /// Build the hasher and the two-class signer from the loaded settings.
    ///
    /// # Errors
    /// * `Token` - A secret is empty, or both secrets are the same
    /// * `Password` - Salt rounds out of range
    /// * `TtlOutOfRange` - A token lifetime is not positive or longer than
    ///   [`MAX_TOKEN_TTL_SECONDS`]
    pub fn authenticator(&self) -> Result<Authenticator, ConfigurationError> {
        let access_ttl = token_ttl("ACCESS_TOKEN_TTL", self.access_token_ttl)?;
        let refresh_ttl = token_ttl("REFRESH_TOKEN_TTL", self.refresh_token_ttl)?;

        let password_hasher = match self.password_salt_rounds {
            Some(rounds) => PasswordHasher::with_cost(rounds)?,
            None => PasswordHasher::new(),
        };

        let token_signer = TokenSigner::new(
            TOKEN_ISSUER,
            TOKEN_AUDIENCE,
            TokenSettings {
                secret: self.access_token_secret.clone(),
                ttl: access_ttl,
            },
            TokenSettings {
                secret: self.refresh_token_secret.clone(),
                ttl: refresh_ttl,
            },
        )?;

        Ok(Authenticator::new(password_hasher, token_signer))
    }

    pub fn password_workers(&self) -> PasswordWorkers {
        match self.password_hash_workers {
            Some(size) => PasswordWorkers::new(size),
            None => PasswordWorkers::from_available_parallelism(),
        }
    }
}

fn token_ttl(key: &'static str, seconds: i64) -> Result<chrono::Duration, ConfigurationError> {
    if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&seconds) {
        return Err(ConfigurationError::TtlOutOfRange(key));
    }

    chrono::Duration::try_seconds(seconds).ok_or(ConfigurationError::TtlOutOfRange(key))
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("password_salt_rounds", &self.password_salt_rounds)
            .field("password_hash_workers", &self.password_hash_workers)
            .finish()
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The URL usually embeds credentials
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
