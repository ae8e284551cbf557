//! TOML configuration file loading
//!
//! The config file uses the long option names as keys (`max-file-kb = 64`).
//! Values from the file only fill options not given on the command line.

use super::args::Args;
use crate::core::error_handling::ContextualError;
use crate::core::logging::LogFormat;
use crate::core::validation::{validate_batch_targets, validate_query};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_DIR_NAME: &str = "Repofuncs";
pub const CONFIG_FILE_NAME: &str = "repofuncs.toml";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{message}")]
    Missing { path: PathBuf, message: String },

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

    #[error("{message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }

    fn missing(path: &Path) -> Self {
        ConfigError::Missing {
            path: path.to_path_buf(),
            message: format!(
                "The specified configuration file does not exist: {}",
                path.display()
            ),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            ConfigError::Missing { .. } | ConfigError::Invalid { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Missing { message, .. } | ConfigError::Invalid { message } => {
                Some(message)
            }
            _ => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// `<config_dir>/Repofuncs/repofuncs.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Args {
    /// Read the config file, if any
    ///
    /// An explicitly named file must exist; the default location is optional.
    pub async fn load_config_file(
        config_file: Option<&Path>,
    ) -> ConfigResult<Option<(PathBuf, toml::Table)>> {
        let path = match config_file {
            Some(path) if !path.exists() => return Err(ConfigError::missing(path)),
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

    /// Fill unset options from a parsed config table
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> ConfigResult<()> {
        for (key, value) in config {
            match key.as_str() {
                "query" => {
                    let query = validate_query(&expect_str(key, value)?)
                        .map_err(ConfigError::invalid)?;
                    self.query.get_or_insert(query);
                }
                "top" => fill(&mut self.top, expect_positive(key, value)?),
                "token" => fill(&mut self.token, expect_str(key, value)?),
                "max-file-kb" => fill(&mut self.max_file_kb, expect_positive(key, value)?),
                "workers" => fill(&mut self.workers, expect_positive(key, value)?),
                "chunk-size" => fill(&mut self.chunk_size, expect_positive(key, value)?),
                "batch-targets" => {
                    let targets = batch_targets_value(key, value)?;
                    fill(&mut self.batch_targets, targets);
                }
                "show-body" => self.show_body |= expect_bool(key, value)?,
                "no-body" => self.no_body |= expect_bool(key, value)?,
                "workdir" => fill(&mut self.workdir, PathBuf::from(expect_str(key, value)?)),
                "keep-archives" => self.keep_archives |= expect_bool(key, value)?,
                "parallel-processes" => self.parallel_processes |= expect_bool(key, value)?,
                "log-level" => {
                    let level = expect_str(key, value)?.to_lowercase();
                    if !LOG_LEVELS.contains(&level.as_str()) {
                        return Err(ConfigError::invalid(format!(
                            "Invalid log-level '{}' in configuration file (expected one of {})",
                            level,
                            LOG_LEVELS.join(", ")
                        )));
                    }
                    fill(&mut self.log_level, level);
                }
                "log-format" => {
                    let format: LogFormat = value.clone().try_into().map_err(|_| {
                        ConfigError::invalid(format!(
                            "Invalid log-format {} in configuration file (expected text, ext or json)",
                            value
                        ))
                    })?;
                    fill(&mut self.log_format, format);
                }
                "log-file" => {
                    let file = expect_str(key, value)?;
                    // "none" and "-" keep logging on stderr
                    if !file.eq_ignore_ascii_case("none") && file != "-" {
                        fill(&mut self.log_file, PathBuf::from(file));
                    }
                }
                "color" => {
                    if self.color_choice().is_none() {
                        let enabled = expect_bool(key, value)?;
                        self.color = enabled;
                        self.no_color = !enabled;
                    }
                }
                other => {
                    return Err(ConfigError::invalid(format!(
                        "Unknown key '{}' in configuration file",
                        other
                    )))
                }
            }
        }
        Ok(())
    }
}

fn fill<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn type_error(key: &str, expected: &str, value: &toml::Value) -> ConfigError {
    ConfigError::invalid(format!(
        "Configuration key '{}' must be {}, found {}",
        key,
        expected,
        value.type_str()
    ))
}

fn expect_str(key: &str, value: &toml::Value) -> ConfigResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| type_error(key, "a string", value))
}

fn expect_bool(key: &str, value: &toml::Value) -> ConfigResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| type_error(key, "true or false", value))
}

fn expect_positive(key: &str, value: &toml::Value) -> ConfigResult<usize> {
    match value.as_integer() {
        Some(n) if n > 0 => Ok(n as usize),
        _ => Err(type_error(key, "a positive integer", value)),
    }
}

/// Accept `"10,20"` or `[10, 20]`
fn batch_targets_value(key: &str, value: &toml::Value) -> ConfigResult<String> {
    let raw = match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_integer()
                    .map(|n| n.to_string())
                    .ok_or_else(|| type_error(key, "a list of integers", value))
            })
            .collect::<ConfigResult<Vec<_>>>()?
            .join(","),
        _ => return Err(type_error(key, "a string or a list of integers", value)),
    };
    validate_batch_targets(&raw).map_err(ConfigError::invalid)
}
