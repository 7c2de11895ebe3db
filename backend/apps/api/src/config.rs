//! Server Configuration
//!
//! Read once from the environment (after `.env` is loaded) and never
//! mutated afterwards.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use sqlx::postgres::PgConnectOptions;

const DEFAULT_PORT: u16 = 3006;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// HTTP server and database settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    pub max_connections: u32,
    pub frontend_origins: Vec<String>,
}

/// Either a full `DATABASE_URL` or its individual parts.
#[derive(Clone)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        name: String,
    },
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match self {
            DatabaseConfig::Url(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid Postgres URL"),
            DatabaseConfig::Parts {
                host,
                port,
                user,
                password,
                name,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(name)),
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseConfig::Url(_) => f.debug_tuple("Url").field(&"[REDACTED]").finish(),
            DatabaseConfig::Parts {
                host, port, user, name, ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &"[REDACTED]")
                .field("name", name)
                .finish(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database = match lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or(&lookup, "DB_PORT", 5432)?,
                user: lookup("DB_USER").unwrap_or_else(|| "postgres".to_string()),
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                name: lookup("DB_NAME").unwrap_or_else(|| "storefront".to_string()),
            },
        };

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            database,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            frontend_origins,
        })
    }
}

/// Build the auth configuration from the environment.
///
/// Release builds refuse to start without `JWT_SECRET`; debug builds fall
/// back to a random secret, so tokens do not survive a restart.
pub fn auth_config_from_env() -> anyhow::Result<AuthConfig> {
    auth_config_from_lookup(|key| std::env::var(key).ok(), cfg!(debug_assertions))
}

fn auth_config_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
    allow_random_secret: bool,
) -> anyhow::Result<AuthConfig> {
    let mut config = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
        Some(secret) => AuthConfig::new(secret),
        None if allow_random_secret => {
            tracing::warn!("JWT_SECRET not set, using a random development secret");
            AuthConfig::development()
        }
        None => bail!("JWT_SECRET must be set in production"),
    };

    if let Some(secs) = lookup("JWT_TTL_SECS") {
        let secs: u64 = secs.parse().context("JWT_TTL_SECS must be a number of seconds")?;
        config = config.with_token_ttl(Duration::from_secs(secs));
    }

    if let Some(pepper) = lookup("PASSWORD_PEPPER").filter(|p| !p.is_empty()) {
        config = config.with_pepper(pepper);
    }

    if let Some(flag) = lookup("ACCEPT_LEGACY_HASHES") {
        config = config.with_legacy_hashes(parse_bool(&flag).with_context(|| {
            format!("ACCEPT_LEGACY_HASHES must be true or false, got {flag:?}")
        })?);
    }

    Ok(config)
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
