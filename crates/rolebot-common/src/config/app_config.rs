//! Application configuration structs
//!
//! Loads configuration from environment variables (and an optional `.env`).

use rolebot_core::Snowflake;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub bot: BotConfig,
    pub store: StoreConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Bot behaviour settings
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// The bot's own user ID; its reactions are never reconciled
    pub user_id: Snowflake,
    pub command_prefix: String,
    /// Reject a second binding for the same message and emoji
    #[serde(default)]
    pub strict_bindings: bool,
    #[serde(default = "default_platform_timeout_ms")]
    pub platform_timeout_ms: u64,
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// JSON file seeding the local platform harness
    #[serde(default)]
    pub platform_fixture: Option<PathBuf>,
}

impl BotConfig {
    #[must_use]
    pub fn platform_timeout(&self) -> Duration {
        Duration::from_millis(self.platform_timeout_ms)
    }
}

/// Binding table location
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Create an empty table when none exists
    #[serde(default)]
    pub init: bool,
}

// Default value functions
fn default_app_name() -> String {
    "rolebot".to_string()
}

fn default_command_prefix(env: Environment) -> String {
    // The development bot answers to '?' so it can share a server with the stable one
    let prefix = if env.is_development() { "?" } else { "~" };
    prefix.to_string()
}

fn default_platform_timeout_ms() -> u64 {
    10_000
}

fn default_event_buffer() -> usize {
    1024
}

fn default_store_path() -> PathBuf {
    PathBuf::from("files/reactionroles.json")
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue(key, other.to_string())),
    }
}

fn parse_positive<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    match value.trim().parse::<T>() {
        Ok(n) if n != T::default() => Ok(n),
        _ => Err(ConfigError::InvalidValue(key, value)),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(s) => {
                Environment::parse(&s).ok_or(ConfigError::InvalidValue("APP_ENV", s))?
            }
            None => Environment::default(),
        };

        let user_id = lookup("BOT_USER_ID").ok_or(ConfigError::MissingVar("BOT_USER_ID"))?;
        let user_id = Snowflake::parse(&user_id)
            .map_err(|_| ConfigError::InvalidValue("BOT_USER_ID", user_id))?;

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            bot: BotConfig {
                user_id,
                command_prefix: lookup("COMMAND_PREFIX")
                    .unwrap_or_else(|| default_command_prefix(env)),
                strict_bindings: lookup("STRICT_BINDINGS")
                    .map(|s| parse_bool("STRICT_BINDINGS", &s))
                    .transpose()?
                    .unwrap_or(false),
                platform_timeout_ms: lookup("PLATFORM_TIMEOUT_MS")
                    .map(|s| parse_positive("PLATFORM_TIMEOUT_MS", s))
                    .transpose()?
                    .unwrap_or_else(default_platform_timeout_ms),
                event_buffer: lookup("EVENT_BUFFER")
                    .map(|s| parse_positive("EVENT_BUFFER", s))
                    .transpose()?
                    .unwrap_or_else(default_event_buffer),
                platform_fixture: lookup("PLATFORM_FIXTURE").map(PathBuf::from),
            },
            store: StoreConfig {
                path: lookup("STORE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_store_path),
                init: lookup("STORE_INIT")
                    .map(|s| parse_bool("STORE_INIT", &s))
                    .transpose()?
                    .unwrap_or(false),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
