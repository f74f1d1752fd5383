/// Service configuration.
///
/// Loaded from a TOML file with serde defaults for every field, so a
/// missing file or an empty file both yield a usable configuration. A
/// `.env` file is honored for deployments; `TERRAMON_STORE_PATH` overrides
/// the record store location.

use serde::Deserialize;

use crate::logging::LogLevel;
use crate::model::TelemetryError;

pub const DEFAULT_CONFIG_PATH: &str = "./terramon.toml";

/// Environment variable overriding `store_path`.
pub const STORE_PATH_ENV: &str = "TERRAMON_STORE_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Path of the JSON-lines record store.
    pub store_path: String,
    /// Optional log file; console-only when absent.
    pub log_file: Option<String>,
    /// Minimum log level: "debug", "info", "warning", or "error".
    pub log_level: String,
    /// Whether console log lines carry timestamps (daemon mode).
    pub console_timestamps: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_path: "./records.jsonl".to_string(),
            log_file: None,
            log_level: "info".to_string(),
            console_timestamps: false,
        }
    }
}

impl ServiceConfig {
    /// The configured minimum log level. Unrecognized labels fall back
    /// to Info.
    pub fn min_level(&self) -> LogLevel {
        match self.log_level.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warning" | "warn" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

/// Loads the configuration from `path`, falling back to defaults when the
/// file does not exist. Environment overrides (including those from a
/// `.env` file) are applied last.
pub fn load(path: &str) -> Result<ServiceConfig, TelemetryError> {
    dotenv::dotenv().ok();

    let mut config = match std::fs::read_to_string(path) {
        Ok(text) => toml::from_str(&text)
            .map_err(|e| TelemetryError::ParseError(format!("{}: {}", path, e)))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ServiceConfig::default(),
        Err(e) => return Err(TelemetryError::Io(format!("{}: {}", path, e))),
    };

    if let Ok(store_path) = std::env::var(STORE_PATH_ENV) {
        config.store_path = store_path;
    }

    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = load("/definitely/not/a/config.toml").unwrap();
        assert_eq!(config.store_path, "./records.jsonl");
        assert_eq!(config.min_level(), LogLevel::Info);
        assert!(config.log_file.is_none());
        assert!(!config.console_timestamps);
    }

    #[test]
    fn test_partial_toml_fills_remaining_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            store_path = "/var/lib/terramon/records.jsonl"
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.store_path, "/var/lib/terramon/records.jsonl");
        assert_eq!(config.min_level(), LogLevel::Debug);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_unrecognized_log_level_falls_back_to_info() {
        let config = ServiceConfig {
            log_level: "loud".to_string(),
            ..ServiceConfig::default()
        };
        assert_eq!(config.min_level(), LogLevel::Info);
    }

    #[test]
    fn test_warn_aliases() {
        for label in ["warning", "warn", "WARN"] {
            let config = ServiceConfig {
                log_level: label.to_string(),
                ..ServiceConfig::default()
            };
            assert_eq!(config.min_level(), LogLevel::Warning, "label '{}'", label);
        }
    }
}
