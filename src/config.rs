use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeoLensConfig {
    pub log_level: String,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
}

/// Default parameter values for the query surface. Each CLI flag falls back
/// to the corresponding field here.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QueryConfig {
    pub near_distance_meters: f64,
    pub near_limit: usize,
    pub similarity_threshold: f64,
    pub similarity_limit: usize,
    pub max_influence_depth: u32,
}

impl Default for GeoLensConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_geolens_dir()
            .join("gazetteer.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashed".into(),
            model: "hashed-bow-v1".into(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            near_distance_meters: 5000.0,
            near_limit: 10,
            similarity_threshold: 0.7,
            similarity_limit: 10,
            max_influence_depth: 2,
        }
    }
}

/// Returns `~/.geolens/`
pub fn default_geolens_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".geolens")
}

/// Returns the default config file path: `~/.geolens/config.toml`
pub fn default_config_path() -> PathBuf {
    default_geolens_dir().join("config.toml")
}

impl GeoLensConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            GeoLensConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (GEOLENS_DB, GEOLENS_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("GEOLENS_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("GEOLENS_LOG_LEVEL") {
            self.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GeoLensConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.embedding.provider, "hashed");
        assert_eq!(config.query.near_limit, 10);
        assert_eq!(config.query.max_influence_depth, 2);
        assert!(config.storage.db_path.ends_with("gazetteer.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
log_level = "debug"

[storage]
db_path = "/tmp/test.db"

[query]
near_distance_meters = 1000.0
similarity_threshold = 0.5
"#;
        let config: GeoLensConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.query.near_distance_meters, 1000.0);
        assert_eq!(config.query.similarity_threshold, 0.5);
        // defaults still apply for unset fields
        assert_eq!(config.query.similarity_limit, 10);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = GeoLensConfig::default();
        std::env::set_var("GEOLENS_DB", "/tmp/override.db");
        std::env::set_var("GEOLENS_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.log_level, "trace");

        // Clean up
        std::env::remove_var("GEOLENS_DB");
        std::env::remove_var("GEOLENS_LOG_LEVEL");
    }
}
