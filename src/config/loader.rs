//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ServiceConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults, applying environment overrides.
///
/// Used when no config file is given on the command line.
pub fn default_config() -> Result<ServiceConfig, ConfigError> {
    let mut config = ServiceConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment variable overrides to a parsed configuration.
///
/// `PORT` overrides the port component of the listener bind address.
fn apply_env_overrides(config: &mut ServiceConfig) {
    if let Ok(port) = std::env::var("PORT") {
        match port.parse::<u16>() {
            Ok(port) => {
                config.listener.bind_address =
                    override_port(&config.listener.bind_address, port);
            }
            Err(_) => {
                tracing::warn!(value = %port, "Ignoring unparseable PORT environment variable");
            }
        }
    }
}

/// Replace the port component of a bind address, keeping the host.
fn override_port(bind_address: &str, port: u16) -> String {
    let host = bind_address
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or("0.0.0.0");
    format!("{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:8080"

            [rate_limit]
            enabled = true
            max_requests = 5
            window_secs = 60
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/greeting.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listener = 42").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    // Env mutation races with parallel tests, so the override logic is
    // exercised directly rather than through std::env.
    #[test]
    fn test_override_port_keeps_host() {
        assert_eq!(override_port("0.0.0.0:3000", 4000), "0.0.0.0:4000");
        assert_eq!(override_port("127.0.0.1:8080", 3000), "127.0.0.1:3000");
    }
}
