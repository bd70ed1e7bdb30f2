//! Configuration management for the Ration Lab backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: RL__)

use anyhow::{Context, Result};
use ration_lab_shared::{FeedCatalogFile, FeedLibrary, ModelParameters};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub model: ModelParameters,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// Feed catalog source
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// TOML file with `[[feeds]]` tables; the standard catalog when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Load the configured feed library
    pub fn load_library(&self) -> Result<FeedLibrary> {
        let Some(path) = &self.path else {
            return Ok(FeedLibrary::standard());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feed catalog {}", path.display()))?;
        parse_catalog(&text)
            .with_context(|| format!("Invalid feed catalog {}", path.display()))
    }
}

/// Parse and validate a TOML feed catalog
pub fn parse_catalog(text: &str) -> Result<FeedLibrary> {
    let file: FeedCatalogFile = toml::from_str(text)?;
    Ok(FeedLibrary::from_catalog(file)?)
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with RL__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (RL__ prefix)
            // e.g., RL__SERVER__PORT=9000 sets server.port
            .add_source(
                config::Environment::with_prefix("RL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.catalog.path.is_none());
        assert_eq!(config.model, ModelParameters::default());
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }

    #[test]
    fn test_default_catalog_is_standard() {
        let library = CatalogConfig::default().load_library().unwrap();
        assert_eq!(library, FeedLibrary::standard());
    }

    #[test]
    fn test_missing_catalog_file_fails() {
        let config = CatalogConfig {
            path: Some(PathBuf::from("/nonexistent/feeds.toml")),
        };
        assert!(config.load_library().is_err());
    }

    #[test]
    fn test_parse_catalog_rejects_invalid_feed() {
        let text = r#"
            [[feeds]]
            name = "straw"
            class = "forage"
            cp = 4.0
            ndf = 0.0
            starch = 1.0
            fat = 1.5
            tdn = 42.0
            ge = 4.2
            pe_ndf = 10.0
            ferment_rate = 0.01
            rdp = 60.0
        "#;
        let err = parse_catalog(text).unwrap_err();
        assert!(err.to_string().contains("pe_ndf"));
    }

    #[test]
    fn test_example_catalog_parses() {
        let library = parse_catalog(include_str!("../../config/feeds.example.toml")).unwrap();
        assert_eq!(library.len(), 4);
        assert!(library.contains("corn_silage"));
    }

    #[test]
    fn test_model_section_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            request_timeout_secs = 10

            [model.acidity]
            sara_threshold = 5.6
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.model.acidity.sara_threshold, 5.6);
        assert_eq!(config.model.acidity.optimal_threshold, 6.2);
    }
}
