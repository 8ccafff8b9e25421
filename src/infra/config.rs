// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::errors::PromptRepeatError;
use crate::infra::paths;
use crate::security::rate_limit::{DEFAULT_SWEEP_INTERVAL, MAX_WINDOW_SECONDS};

/// Upper bound for `llm.timeout_seconds`.
pub const MAX_TIMEOUT_SECONDS: u64 = 60 * 60;
/// Upper bound for `rate_limit.sweep_interval_seconds`.
pub const MAX_SWEEP_INTERVAL_SECONDS: u64 = 24 * 60 * 60;

/// Model used when a request does not name one.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Generation model when the caller does not pick one.
    #[serde(default = "default_model")]
    pub default: String,
    /// Model for classification, intent expansion and alignment checks.
    #[serde(default = "default_model")]
    pub utility: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: default_model(),
            utility: default_model(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Upper bound on any single backend call.
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per caller per window.
    pub limit: u32,
    pub window_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            window_seconds: 60,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL.as_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8787,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the limiter or timeouts meaningless.
    pub fn validate(&self) -> Result<(), PromptRepeatError> {
        check_range("llm.timeout_seconds", self.llm.timeout_seconds, MAX_TIMEOUT_SECONDS)?;
        check_range(
            "rate_limit.window_seconds",
            self.rate_limit.window_seconds,
            MAX_WINDOW_SECONDS,
        )?;
        check_range(
            "rate_limit.sweep_interval_seconds",
            self.rate_limit.sweep_interval_seconds,
            MAX_SWEEP_INTERVAL_SECONDS,
        )
    }
}

fn check_range(field: &str, value: u64, max: u64) -> Result<(), PromptRepeatError> {
    if value == 0 || value > max {
        return Err(PromptRepeatError::Config(format!(
            "{field} must be between 1 and {max} (got {value})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.models.default, "gemini-3-flash-preview");
        assert_eq!(c.models.utility, "gemini-3-flash-preview");
        assert_eq!(c.llm.timeout_seconds, 30);
        assert_eq!(c.rate_limit.limit, 20);
        assert_eq!(c.rate_limit.window_seconds, 60);
        assert_eq!(c.server.port, 8787);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.rate_limit.sweep_interval_seconds, 60);
        assert_eq!(config.models.default, DEFAULT_MODEL);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[models]
default = "gemini-3.1-pro-preview"
utility = "gemini-2.5-flash"

[llm]
timeout_seconds = 45

[rate_limit]
limit = 5
window_seconds = 10
sweep_interval_seconds = 30

[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models.default, "gemini-3.1-pro-preview");
        assert_eq!(config.models.utility, "gemini-2.5-flash");
        assert_eq!(config.llm.timeout(), Duration::from_secs(45));
        assert_eq!(config.rate_limit.limit, 5);
        assert_eq!(config.rate_limit.window_seconds, 10);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_partial_models_section_keeps_defaults() {
        let config: Config = toml::from_str("[models]\ndefault = \"x\"\n").unwrap();
        assert_eq!(config.models.default, "x");
        assert_eq!(config.models.utility, DEFAULT_MODEL);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rate_limit]\nlimit = 3\nwindow_seconds = 60\nsweep_interval_seconds = 60").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.rate_limit.limit, 3);
    }

    #[test]
    fn test_load_rejects_zero_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rate_limit]\nlimit = 3\nwindow_seconds = 0\nsweep_interval_seconds = 60").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("window_seconds"));
    }

    #[test]
    fn test_partial_sections_fill_missing_fields() {
        let config: Config = toml::from_str("[rate_limit]\nlimit = 5\n").unwrap();
        assert_eq!(config.rate_limit.limit, 5);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert_eq!(config.rate_limit.sweep_interval_seconds, 60);

        let config: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");

        let config: Config = toml::from_str("[llm]\n").unwrap();
        assert_eq!(config.llm.timeout_seconds, 30);
    }

    #[test]
    fn test_load_partial_section_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rate_limit]\nlimit = 5").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.rate_limit.limit, 5);
        assert_eq!(config.rate_limit.window_seconds, 60);
    }

    #[test]
    fn test_validate_rejects_oversized_values() {
        let mut config = Config::default();
        config.rate_limit.window_seconds = u64::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rate_limit.window_seconds"));

        let mut config = Config::default();
        config.llm.timeout_seconds = MAX_TIMEOUT_SECONDS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rate_limit.sweep_interval_seconds = MAX_SWEEP_INTERVAL_SECONDS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rate_limit.window_seconds = MAX_WINDOW_SECONDS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.rate_limit.limit, config.rate_limit.limit);
        assert_eq!(deserialized.server.port, config.server.port);
    }
}
