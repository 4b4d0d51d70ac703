use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid sample_count: {0}. Must be at least 1")]
    InvalidSampleCount(i64),

    #[error("Invalid preview_chars: {0}. Must be at least 1")]
    InvalidPreviewChars(usize),

    #[error("Invalid synthesis_chars: {0}. Must be at least 1")]
    InvalidSynthesisChars(usize),

    #[error("Model base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Default model cannot be empty")]
    EmptyDefaultModel,

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .reprompt/config.yaml (project config)
    /// 3. .reprompt/local.yaml (local overrides, optional)
    /// 4. Environment variables (REPROMPT_* prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".reprompt/config.yaml"))
            .merge(Yaml::file(".reprompt/local.yaml"))
            .merge(Env::prefixed("REPROMPT_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    ///
    /// Unlike the `.reprompt/` files, an explicitly named file must exist.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        if !path.as_ref().is_file() {
            return Err(ConfigError::FileNotFound(path.as_ref().display().to_string()).into());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("REPROMPT_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let optimizer = &config.optimizer;
        if optimizer.sample_count < 1 {
            return Err(ConfigError::InvalidSampleCount(optimizer.sample_count));
        }
        if optimizer.preview_chars == 0 {
            return Err(ConfigError::InvalidPreviewChars(optimizer.preview_chars));
        }
        if optimizer.synthesis_chars == 0 {
            return Err(ConfigError::InvalidSynthesisChars(optimizer.synthesis_chars));
        }

        let model = &config.model;
        if model.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if model.default_model.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultModel);
        }
        if model.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(model.timeout_secs));
        }
        if model.initial_backoff_ms > model.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                model.initial_backoff_ms,
                model.max_backoff_ms,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{LoggingConfig, ModelConfig, OptimizerConfig};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert_eq!(config.model.default_model, "llama3.1");
        assert_eq!(config.model.max_retries, 0);
        assert_eq!(config.optimizer.sample_count, 5);
        assert_eq!(config.optimizer.preview_chars, 150);
        assert_eq!(config.optimizer.synthesis_chars, 400);
        assert!(config.optimizer.reject_empty_prompt);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
model:
  base_url: http://gpu-box:11434
  default_model: mistral
  max_retries: 2
optimizer:
  sample_count: 8
  reject_empty_prompt: false
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.model.base_url, "http://gpu-box:11434");
        assert_eq!(config.model.default_model, "mistral");
        assert_eq!(config.model.max_retries, 2);
        assert_eq!(config.model.timeout_secs, 300);
        assert_eq!(config.optimizer.sample_count, 8);
        assert_eq!(config.optimizer.preview_chars, 150);
        assert!(!config.optimizer.reject_empty_prompt);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            model: ModelConfig {
                base_url: "http://localhost:11434".to_string(),
                default_model: "llama3.1".to_string(),
                timeout_secs: 60,
                max_retries: 3,
                initial_backoff_ms: 100,
                max_backoff_ms: 1000,
            },
            optimizer: OptimizerConfig {
                sample_count: 3,
                preview_chars: 100,
                synthesis_chars: 200,
                reject_empty_prompt: true,
            },
            logging: LoggingConfig::default(),
        };
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_sample_count() {
        let mut config = Config::default();
        config.optimizer.sample_count = 0;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidSampleCount(0))));
    }

    #[test]
    fn test_validate_negative_sample_count() {
        let mut config = Config::default();
        config.optimizer.sample_count = -3;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidSampleCount(-3))));
    }

    #[test]
    fn test_validate_zero_preview_chars() {
        let mut config = Config::default();
        config.optimizer.preview_chars = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPreviewChars(0))
        ));
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = Config::default();
        config.model.base_url = "  ".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyBaseUrl)
        ));
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = Config::default();
        config.model.default_model = String::new();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDefaultModel)
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        let result = ConfigLoader::validate(&config);
        match result.unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        let result = ConfigLoader::validate(&config);
        match result.unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_backoff() {
        let mut config = Config::default();
        config.model.initial_backoff_ms = 30_000;
        config.model.max_backoff_ms = 10_000;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoff(30_000, 10_000))
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "optimizer:\n  sample_count: 4\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "optimizer:\n  sample_count: 9\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.optimizer.sample_count, 9, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
        assert_eq!(config.model.default_model, "llama3.1", "Defaults fill the rest");
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "model:\n  default_model: qwen2\noptimizer:\n  preview_chars: 80").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.model.default_model, "qwen2");
        assert_eq!(config.optimizer.preview_chars, 80);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "optimizer:\n  sample_count: 0").unwrap();
        file.flush().unwrap();

        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-here.yaml");

        let err = ConfigLoader::load_from_file(&missing).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::FileNotFound(_))
        ));
    }
}
