//! TOML configuration file loading
//!
//! Keys mirror the long command line flags. Default location is
//! `<config dir>/GitReaper/gitreaper.toml`; a missing default file is not an
//! error, a missing explicit file is.
//!
//! ```toml
//! token = "ghp_..."
//! tokens = ["ghp_backup1", "ghp_backup2"]
//! timeout = 300
//! adaptive-timeout = true
//! log-level = "info"
//! ```

use std::path::{Path, PathBuf};

use crate::core::logging::LOG_FORMATS;
use crate::core::validation::{validate_repository_url, ValidationError};

use super::args::Args;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Error in configuration file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

/// Default configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("GitReaper").join("gitreaper.toml"))
}

/// Read and parse the configuration file, if there is one
pub async fn load_config_file(
    config_file: Option<&Path>,
) -> Result<Option<(PathBuf, toml::Table)>, ConfigError> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    let table = toml::from_str::<toml::Table>(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    Ok(Some((path, table)))
}

impl Args {
    /// Load the configuration file and fill in every value the command
    /// line left unset
    pub async fn merge_config_file(&mut self) -> Result<Option<PathBuf>, ConfigError> {
        let Some((path, table)) = load_config_file(self.config_file.as_deref()).await? else {
            return Ok(None);
        };
        self.apply_toml_values(&table)
            .map_err(|source| ConfigError::Invalid {
                path: path.clone(),
                source,
            })?;
        Ok(Some(path))
    }

    /// Apply TOML values to fields the command line did not set
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), ValidationError> {
        if self.repository_url().is_none() {
            if let Some(url) = Self::string_field(config, "repository")? {
                self.repository = Some(validate_repository_url(&url)?);
            }
        }
        if self.token.is_none() {
            self.token = Self::string_field(config, "token")?;
        }
        self.config_tokens.extend(Self::string_array_field(config, "tokens")?);

        if self.timeout.is_none() {
            self.timeout = Self::seconds_field(config, "timeout")?;
        }
        if self.request_timeout.is_none() {
            self.request_timeout = Self::seconds_field(config, "request-timeout")?;
        }
        if let Some(adaptive) = Self::bool_field(config, "adaptive-timeout")? {
            self.no_adaptive_timeout |= !adaptive;
        }
        if self.api_url.is_none() {
            self.api_url = Self::string_field(config, "api-url")?;
        }
        if let Some(json) = Self::bool_field(config, "json")? {
            self.json |= json;
        }
        self.config_color = Self::bool_field(config, "color")?;

        if self.log_level.is_none() {
            self.log_level = Self::choice_field(config, "log-level", LOG_LEVELS)?;
        }
        if self.log_format.is_none() {
            self.log_format = Self::choice_field(config, "log-format", LOG_FORMATS)?;
        }
        if self.log_file.is_none() {
            self.log_file = Self::string_field(config, "log-file")?.map(PathBuf::from);
        }
        Ok(())
    }

    fn string_field(config: &toml::Table, key: &str) -> Result<Option<String>, ValidationError> {
        match config.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| ValidationError::new(format!("'{}' must be a string", key))),
        }
    }

    /// Accepts a single string or an array of strings
    fn string_array_field(config: &toml::Table, key: &str) -> Result<Vec<String>, ValidationError> {
        let invalid = || ValidationError::new(format!("'{}' must be a string or array of strings", key));
        match config.get(key) {
            None => Ok(Vec::new()),
            Some(toml::Value::String(s)) => Ok(vec![s.clone()]),
            Some(toml::Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
                .collect(),
            Some(_) => Err(invalid()),
        }
    }

    fn bool_field(config: &toml::Table, key: &str) -> Result<Option<bool>, ValidationError> {
        match config.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| ValidationError::new(format!("'{}' must be true or false", key))),
        }
    }

    fn seconds_field(config: &toml::Table, key: &str) -> Result<Option<u64>, ValidationError> {
        match config.get(key).map(|value| value.as_integer()) {
            None => Ok(None),
            Some(Some(secs)) if secs > 0 => Ok(Some(secs as u64)),
            Some(_) => Err(ValidationError::new(format!(
                "'{}' must be a whole number of seconds greater than 0",
                key
            ))),
        }
    }

    fn choice_field(
        config: &toml::Table,
        key: &str,
        choices: &[&str],
    ) -> Result<Option<String>, ValidationError> {
        match Self::string_field(config, key)? {
            Some(value) if !choices.contains(&value.as_str()) => Err(ValidationError::new(
                format!("'{}' must be one of: {}", key, choices.join(", ")),
            )),
            value => Ok(value),
        }
    }
}
