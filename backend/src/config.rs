//! Configuration management for the Whiskey Wiz server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with WHISKEY_ prefix (`__` separates sections)

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token verification for the external identity provider
    pub auth: AuthConfig,

    /// Leaderboard paging limits
    pub leaderboard: LeaderboardConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. Without one, results are kept in memory.
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LeaderboardConfig {
    /// Rows returned when the request has no `limit`
    pub default_limit: usize,

    /// Upper bound for a requested `limit`
    pub max_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,

    /// Filter used when RUST_LOG is unset
    pub filter: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WHISKEY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.run_migrations", environment == "development")?
            .set_default("auth.jwt_secret", "development-secret-key")?
            .set_default("leaderboard.default_limit", 25)?
            .set_default("leaderboard.max_limit", 100)?
            .set_default("logging.json", false)?
            .set_default(
                "logging.filter",
                "whiskey_wiz_server=debug,whiskey_wiz_backend=debug,tower_http=debug,sqlx=warn",
            )?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WHISKEY_ prefix)
            .add_source(
                Environment::with_prefix("WHISKEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.environment == "production" && self.auth.jwt_secret == "development-secret-key" {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set in production".to_string(),
            ));
        }
        if self.leaderboard.default_limit == 0
            || self.leaderboard.default_limit > self.leaderboard.max_limit
        {
            return Err(ConfigError::Message(
                "leaderboard.default_limit must be between 1 and leaderboard.max_limit".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                min_connections: 2,
                run_migrations: false,
            },
            auth: AuthConfig {
                jwt_secret: "development-secret-key".to_string(),
            },
            leaderboard: LeaderboardConfig {
                default_limit: 25,
                max_limit: 100,
            },
            logging: LoggingConfig {
                json: false,
                filter: "whiskey_wiz_server=debug,whiskey_wiz_backend=debug,tower_http=debug"
                    .to_string(),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl LeaderboardConfig {
    /// Resolve a requested limit against the configured bounds
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_checks() {
        assert!(Config::default().check().is_ok());
    }

    #[test]
    fn test_production_requires_secret() {
        let config = Config {
            environment: "production".to_string(),
            ..Config::default()
        };
        assert!(config.check().is_err());
    }

    #[test]
    fn test_resolve_limit() {
        let leaderboard = Config::default().leaderboard;
        assert_eq!(leaderboard.resolve_limit(None), 25);
        assert_eq!(leaderboard.resolve_limit(Some(0)), 1);
        assert_eq!(leaderboard.resolve_limit(Some(10)), 10);
        assert_eq!(leaderboard.resolve_limit(Some(1000)), 100);
    }
}
