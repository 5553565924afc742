//! Service configuration loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `HOMEVAL_CONFIG` environment variable (path to TOML file)
//! 2. `homeval.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The config is constructed once in `main()` and passed by reference;
//! there is no global config state.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "HOMEVAL_CONFIG";

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "homeval.toml";

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the HTTP server.
    pub addr: String,
}

/// File locations for training snapshots and record stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub house_features_csv: String,
    pub market_features_csv: String,
    pub price_store: String,
    pub sale_store: String,
}

/// Estimator hyperparameters and training-snapshot constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Year the training snapshot was taken. Property age is computed
    /// against this, never against wall-clock time.
    pub reference_year: i32,
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Fraction of features considered at each split, in (0, 1].
    pub max_features: f64,
    /// Bootstrap RNG seed; fixed so retraining is reproducible.
    pub seed: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            house_features_csv: "dataset/house_features.csv".to_string(),
            market_features_csv: "dataset/market_features.csv".to_string(),
            price_store: "db/predictions.json".to_string(),
            sale_store: "db/sale_predictions.json".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            reference_year: 2024,
            n_trees: 90,
            max_depth: 35,
            min_samples_split: 5,
            max_features: 0.9,
            seed: 42,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ServiceConfig {
    /// Load configuration following the documented order.
    ///
    /// A missing file in the working directory falls back to defaults; a
    /// file that exists but fails to read or parse is a hard error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            tracing::info!(path = %path, "loading config from {CONFIG_ENV_VAR}");
            return Self::from_file(&path);
        }
        if Path::new(CONFIG_FILE_NAME).exists() {
            tracing::info!("loading config from ./{CONFIG_FILE_NAME}");
            return Self::from_file(CONFIG_FILE_NAME);
        }
        tracing::info!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load and validate a specific TOML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants before any training starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "server.addr {:?} is not a valid socket address",
                self.server.addr
            )));
        }
        if self.model.n_trees == 0 {
            return Err(ConfigError::Invalid(
                "model.n_trees must be at least 1".to_string(),
            ));
        }
        if self.model.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "model.max_depth must be at least 1".to_string(),
            ));
        }
        if self.model.min_samples_split < 2 {
            return Err(ConfigError::Invalid(
                "model.min_samples_split must be at least 2".to_string(),
            ));
        }
        if !(self.model.max_features > 0.0 && self.model.max_features <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "model.max_features must be in (0, 1], got {}",
                self.model.max_features
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model.n_trees, 90);
        assert_eq!(config.model.reference_year, 2024);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [server]
            addr = "0.0.0.0:9000"

            [model]
            n_trees = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:9000");
        assert_eq!(config.model.n_trees, 10);
        // untouched sections keep defaults
        assert_eq!(config.model.max_depth, 35);
        assert_eq!(config.data.price_store, "db/predictions.json");
    }

    #[test]
    fn test_validate_rejects_bad_addr() {
        let mut config = ServiceConfig::default();
        config.server.addr = "not-an-addr".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_feature_fraction_out_of_range() {
        let mut config = ServiceConfig::default();
        config.model.max_features = 1.5;
        assert!(config.validate().is_err());
        config.model.max_features = 0.0;
        assert!(config.validate().is_err());
    }
}
