use std::env;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Variables that must be present in the environment.
const REQUIRED: [&str; 2] = ["DATABASE_URL", "JWT_SECRET_KEY"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

/// Process configuration, read once at start-up.
///
/// Not `Debug`: it holds the database URL and the signing secret.
#[derive(Clone)]
pub struct Config {
    pub environment: String,
    pub debug: bool,
    pub api_v1_prefix: String,
    pub project_name: String,
    pub version: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_pool_min_size: u32,
    pub db_pool_max_size: u32,
    pub db_command_timeout: Duration,
    pub db_acquire_timeout: Duration,
    pub jwt_secret_key: String,
    pub jwt_algorithm: Algorithm,
    pub log_level: String,
    pub log_format: LogFormat,
    /// `["*"]` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset and empty values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let text = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        for name in REQUIRED {
            if var(name).is_none() {
                return Err(ConfigError::Missing(name));
            }
        }

        Ok(Config {
            environment: text("ENVIRONMENT", "development"),
            debug: parse_bool("DEBUG", var("DEBUG"), true)?,
            api_v1_prefix: text("API_V1_PREFIX", "/api/v1"),
            project_name: text("PROJECT_NAME", "Activities API"),
            version: text("VERSION", env!("CARGO_PKG_VERSION")),
            host: text("HOST", "0.0.0.0"),
            port: parse("PORT", var("PORT"), 8000)?,
            database_url: text("DATABASE_URL", ""),
            db_pool_min_size: parse("DB_POOL_MIN_SIZE", var("DB_POOL_MIN_SIZE"), 10)?,
            db_pool_max_size: parse("DB_POOL_MAX_SIZE", var("DB_POOL_MAX_SIZE"), 50)?,
            db_command_timeout: Duration::from_secs(parse(
                "DB_COMMAND_TIMEOUT",
                var("DB_COMMAND_TIMEOUT"),
                60,
            )?),
            db_acquire_timeout: Duration::from_secs(parse(
                "DB_ACQUIRE_TIMEOUT",
                var("DB_ACQUIRE_TIMEOUT"),
                30,
            )?),
            jwt_secret_key: text("JWT_SECRET_KEY", ""),
            jwt_algorithm: parse_algorithm(var("JWT_ALGORITHM"))?,
            log_level: text("LOG_LEVEL", "INFO"),
            log_format: match var("LOG_FORMAT").map(|v| v.to_ascii_lowercase()).as_deref() {
                None | Some("json") => LogFormat::Json,
                Some(_) => LogFormat::Text,
            },
            allowed_origins: text("ALLOWED_ORIGINS", "*")
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Raw collaborator messages may appear in error details.
    pub fn expose_internal_errors(&self) -> bool {
        self.debug && !self.is_production()
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn parse<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn parse_bool(name: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            name,
            value: value.unwrap_or_default(),
        }),
    }
}

fn parse_algorithm(value: Option<String>) -> Result<Algorithm, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("HS256") => Ok(Algorithm::HS256),
        Some("HS384") => Ok(Algorithm::HS384),
        Some("HS512") => Ok(Algorithm::HS512),
        Some(other) => Err(ConfigError::Invalid {
            name: "JWT_ALGORITHM",
            value: other.to_string(),
        }),
    }
}
