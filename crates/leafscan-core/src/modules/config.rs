//! Configuration file loading and saving.
//!
//! Lookup order: explicit path, then `<config_dir>/leafscan/leafscan.json`,
//! then built-in defaults. `GROQ_API_KEY` overrides the generator key.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use validator::Validate;

use leafscan_types::{ConfigError, LeafscanConfig};

const CONFIG_DIR_NAME: &str = "leafscan";
const CONFIG_FILE: &str = "leafscan.json";

/// Environment variable holding the generator API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default config file location for this platform.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// Load, apply environment overrides, and validate.
///
/// An explicit path that does not exist is an error; a missing default file
/// is not.
pub fn load_config(explicit: Option<&Path>) -> Result<LeafscanConfig, ConfigError> {
    let mut config = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound { path: path.display().to_string() });
            }
            read_config_file(path)?
        }
        None => match default_config_path() {
            Ok(path) if path.exists() => read_config_file(&path)?,
            _ => {
                debug!("No config file found, using defaults");
                LeafscanConfig::default()
            }
        },
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config.validate().map_err(|e| ConfigError::ValidationError { message: e.to_string() })?;
    Ok(config)
}

/// Parse a config file without overrides or validation.
pub fn read_config_file(path: &Path) -> Result<LeafscanConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError { message: format!("{}: {}", path.display(), e) })?;
    let config = serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Apply environment overrides, reading variables through `lookup`.
pub fn apply_env_overrides<F>(config: &mut LeafscanConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
        config.generator.api_key = key.trim().to_string();
    }
}

/// Fail unless a generator API key is configured.
pub fn require_api_key(config: &LeafscanConfig) -> Result<(), ConfigError> {
    if config.generator.api_key.trim().is_empty() {
        return Err(ConfigError::MissingSetting {
            field: "generator.api_key".to_string(),
            hint: format!("set {} or generator.api_key in the config file", API_KEY_ENV),
        });
    }
    Ok(())
}

/// Write `config` to `path` atomically, creating parent directories.
pub fn save_config(config: &LeafscanConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::from_io_error(&e))?;
    }
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::WriteError { message: e.to_string() })?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(|e| ConfigError::from_io_error(&e))?;
    fs::rename(&temp_path, path).map_err(|e| ConfigError::from_io_error(&e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_path_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config(Some(&tmp.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("leafscan.json");
        let mut config = LeafscanConfig::default();
        config.server.port = 9200;
        config.tools.backend_url = "http://10.0.0.5:8000".to_string();

        save_config(&config, &path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = read_config_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("leafscan.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(Some(&path)).unwrap_err(), ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("leafscan.json");
        fs::write(&path, r#"{"generator": {"temperature": 9.0}}"#).unwrap();
        assert!(matches!(
            load_config(Some(&path)).unwrap_err(),
            ConfigError::ValidationError { .. }
        ));
    }

    #[test]
    fn test_env_key_overrides_file() {
        let mut config = LeafscanConfig::default();
        config.generator.api_key = "from-file".to_string();

        apply_env_overrides(&mut config, |name| {
            (name == API_KEY_ENV).then(|| " gsk-env ".to_string())
        });
        assert_eq!(config.generator.api_key, "gsk-env");

        apply_env_overrides(&mut config, |_| Some(String::new()));
        assert_eq!(config.generator.api_key, "gsk-env");
    }

    #[test]
    fn test_require_api_key() {
        let mut config = LeafscanConfig::default();
        assert!(matches!(
            require_api_key(&config).unwrap_err(),
            ConfigError::MissingSetting { .. }
        ));
        config.generator.api_key = "gsk".to_string();
        assert!(require_api_key(&config).is_ok());
    }
}
