//! quadgl configuration system.
//!
//! TOML-based configuration with validation. Every section has defaults,
//! so partial configs (or none at all) work out of the box.
//!
//! ```rust,no_run
//! use quadgl_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod colors;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{QuadglConfig, CONFIG_SCHEMA_VERSION};

use quadgl_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<QuadglConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<QuadglConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &QuadglConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&QuadglConfig::default());
        assert!(json.contains("\"renderer\""));
        assert!(json.contains("\"viewport\""));
        assert!(json.contains("\"camera\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"#334b4b\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[renderer]\nmax_quads = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&QuadglConfig::default());
        let parsed: QuadglConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.renderer.max_texture_units, 32);
        assert_eq!(parsed.viewport.height, 768);
    }
}
