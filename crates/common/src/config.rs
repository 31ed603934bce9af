//! Application configuration.

use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token signing configuration.
    pub auth: AuthConfig,
    /// LLM analysis configuration.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Keep-alive ping configuration.
    #[serde(default)]
    pub keep_alive: KeepAliveConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Bearer token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

/// LLM completion API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Chat completions endpoint.
    #[serde(default = "default_analysis_url")]
    pub api_url: String,
    /// API key. Analysis endpoints are unavailable without one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name.
    #[serde(default = "default_analysis_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens in a reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// How long a parsed reply stays cached, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_url: default_analysis_url(),
            api_key: None,
            model: default_analysis_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

/// Periodic self-ping configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct KeepAliveConfig {
    /// Whether the ping task runs at all.
    #[serde(default)]
    pub enabled: bool,
    /// Seconds between pings.
    #[serde(default = "default_keep_alive_interval")]
    pub interval_secs: u64,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_keep_alive_interval(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_token_ttl() -> u64 {
    60 * 60 * 24
}

fn default_analysis_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_analysis_model() -> String {
    "gpt-4o".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    1000
}

const fn default_cache_ttl() -> u64 {
    3600
}

const fn default_keep_alive_interval() -> u64 {
    14 * 60
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present, into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `LETCOOK_ENV`)
    /// 4. Environment variables with `LETCOOK_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("LETCOOK_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LETCOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize::<Self>()?.checked()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("LETCOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize::<Self>()?.checked()
    }

    /// Reject values that deserialize but cannot be used.
    fn checked(self) -> Result<Self, config::ConfigError> {
        if self.keep_alive.interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "keep_alive.interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    /// Parse the public server URL.
    pub fn public_url(&self) -> Result<Url, config::ConfigError> {
        Url::parse(&self.server.url)
            .map_err(|e| config::ConfigError::Message(format!("invalid server.url: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn from_toml(src: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Config>()?
            .checked()
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = from_toml(
            r#"
            [server]
            url = "https://letcook.example"

            [database]
            url = "postgres://localhost/letcook"

            [auth]
            jwt_secret = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.token_ttl_secs, 86_400);
        assert!(config.analysis.api_key.is_none());
        assert_eq!(config.analysis.model, "gpt-4o");
        assert!(!config.keep_alive.enabled);
        assert_eq!(config.keep_alive.interval_secs, 840);
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = from_toml(
            r#"
            [server]
            url = "https://letcook.example"

            [database]
            url = "postgres://localhost/letcook"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_keep_alive_interval_is_an_error() {
        let result = from_toml(
            r#"
            [server]
            url = "https://letcook.example"

            [database]
            url = "postgres://localhost/letcook"

            [auth]
            jwt_secret = "secret"

            [keep_alive]
            enabled = true
            interval_secs = 0
            "#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("keep_alive.interval_secs"));
    }

    #[test]
    fn test_public_url_rejects_garbage() {
        let mut config = from_toml(
            r#"
            [server]
            url = "https://letcook.example"

            [database]
            url = "postgres://localhost/letcook"

            [auth]
            jwt_secret = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.public_url().unwrap().host_str(),
            Some("letcook.example")
        );

        config.server.url = "not a url".to_string();
        assert!(config.public_url().is_err());
    }
}
