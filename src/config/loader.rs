//! Configuration loading from disk and the environment.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_API_KEY: &str = "DOKPLOY_API_KEY";
pub const ENV_API_DOMAIN: &str = "DOKPLOY_API_DOMAIN";
pub const ENV_APPLICATION_ID: &str = "DOKPLOY_APPLICATION_ID";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: AppConfig = toml::from_str(&content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Like [`load_config`], but a missing file yields validated defaults.
pub fn load_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    tracing::warn!(path = %path.display(), "Config file not found, using defaults");
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay store coordinates from the environment; blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(key) = present(ENV_API_KEY) {
        tracing::debug!(variable = ENV_API_KEY, "Store API key taken from environment");
        config.store.api_key = key;
    }
    if let Some(domain) = present(ENV_API_DOMAIN) {
        tracing::debug!(variable = ENV_API_DOMAIN, domain = %domain, "Store domain taken from environment");
        config.store.api_domain = domain;
    }
    if let Some(app) = present(ENV_APPLICATION_ID) {
        tracing::debug!(variable = ENV_APPLICATION_ID, app = %app, "Application id taken from environment");
        config.store.application_id = app;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
[store]
api_domain = "https://dokploy.example.com"
application_id = "app-1"

[routing]
backend_service = "api"
frontend_service = "web"
"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.routing.backend_service, "api");
        assert_eq!(config.timeouts.connect_secs, 30);
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[routing\nbackend_service = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[timeouts]\nrequest_secs = 0\n").unwrap();

        let err = load_config(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("timeouts.request_secs"));
        assert!(message.contains("routing.backend_service"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_env_overrides_skip_blank() {
        let mut config: AppConfig = toml::from_str(MINIMAL).unwrap();
        apply_env_overrides(&mut config, |key| match key {
            ENV_API_KEY => Some("from-env".to_string()),
            ENV_APPLICATION_ID => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.store.api_key, "from-env");
        assert_eq!(config.store.application_id, "app-1");
        assert_eq!(config.store.api_domain, "https://dokploy.example.com");
    }
}
