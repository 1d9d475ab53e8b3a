//! Configuration management for the Tailoring Orders Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with TAILOR_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Order store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Piece code and label configuration
    pub pieces: PieceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// JSON snapshot loaded into the in-memory store at startup
    pub seed_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PieceConfig {
    /// Prefix of every generated piece code
    pub code_prefix: String,

    /// Base URL printed on piece labels, e.g. https://orders.example.com
    pub public_base_url: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("TAILOR_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("pieces.code_prefix", shared::DEFAULT_PIECE_PREFIX)?
            .set_default("pieces.public_base_url", "http://localhost:3000")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (TAILOR_ prefix)
            .add_source(
                Environment::with_prefix("TAILOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            pieces: PieceConfig::default(),
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

impl Default for PieceConfig {
    fn default() -> Self {
        Self {
            code_prefix: shared::DEFAULT_PIECE_PREFIX.to_string(),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.pieces.code_prefix, "PC");
        assert!(config.store.seed_path.is_none());
    }

    #[test]
    fn test_load_without_store_settings() {
        // No config file and no TAILOR__STORE__* variables in the test env
        let config = Config::load().unwrap();
        assert!(config.store.seed_path.is_none());
        assert!(!config.pieces.code_prefix.is_empty());
    }
}
