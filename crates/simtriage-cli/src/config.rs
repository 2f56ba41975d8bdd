//! YAML configuration with precedence defaults < config file < flags.
//!
//! Only presentation and diagnostics are configurable. Signal patterns and
//! classification rules are fixed.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::TriageError;
use crate::logger::LogLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("output format must be one of text, json (got {other:?})")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub summary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig {
                format: OutputFormat::Text,
                summary: false,
            },
            logging: LoggingConfig {
                level: LogLevel::Info,
                file: None,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    #[serde(default)]
    output: PartialOutputConfig,
    #[serde(default)]
    logging: PartialLoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
struct PartialOutputConfig {
    #[serde(default)]
    format: String,
    #[serde(default)]
    summary: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialLoggingConfig {
    #[serde(default)]
    level: String,
    #[serde(default)]
    file: String,
}

/// Loads the config. An explicit path must be readable; the default path is
/// optional. Returns the config and the file it came from, if any.
pub fn load_config(
    explicit: Option<&str>,
    default_path: Option<PathBuf>,
) -> Result<(Config, Option<PathBuf>), TriageError> {
    let mut cfg = Config::default();

    let explicit = explicit
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let (path_to_try, used) = match explicit {
        Some(path) => (Some(path), true),
        None => (default_path, false),
    };

    if let Some(path) = path_to_try {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let parsed = parse_partial(&text)?;
                apply_partial(&mut cfg, parsed)?;
                return Ok((cfg, Some(path)));
            }
            Err(err) => {
                if used {
                    return Err(TriageError::Config(format!(
                        "failed to load config file {}: {err}",
                        path.display()
                    )));
                }
            }
        }
    }

    Ok((cfg, None))
}

pub fn parse_config(text: &str) -> Result<Config, TriageError> {
    let mut cfg = Config::default();
    apply_partial(&mut cfg, parse_partial(text)?)?;
    Ok(cfg)
}

fn parse_partial(text: &str) -> Result<PartialConfig, TriageError> {
    // An empty document deserializes as unit, not as an empty mapping.
    if text.trim().is_empty() {
        return Ok(PartialConfig::default());
    }
    serde_yaml::from_str(text).map_err(|err| TriageError::Config(format!("parse config: {err}")))
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("simtriage").join("config.yaml"));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(
                PathBuf::from(home)
                    .join(".config")
                    .join("simtriage")
                    .join("config.yaml"),
            );
        }
    }
    None
}

fn apply_partial(cfg: &mut Config, partial: PartialConfig) -> Result<(), TriageError> {
    if !partial.output.format.trim().is_empty() {
        cfg.output.format = partial
            .output
            .format
            .parse()
            .map_err(|err| TriageError::Config(format!("output.format: {err}")))?;
    }
    if let Some(summary) = partial.output.summary {
        cfg.output.summary = summary;
    }
    if !partial.logging.level.trim().is_empty() {
        cfg.logging.level = partial
            .logging
            .level
            .parse()
            .map_err(|err| TriageError::Config(format!("logging.level: {err}")))?;
    }
    if !partial.logging.file.trim().is_empty() {
        cfg.logging.file = Some(expand_tilde(partial.logging.file.trim())?);
    }
    Ok(())
}

pub fn expand_tilde(input: &str) -> Result<PathBuf, TriageError> {
    let home = || {
        std::env::var("HOME").map_err(|_| TriageError::Config("failed to resolve HOME".into()))
    };
    if input == "~" {
        return Ok(PathBuf::from(home()?));
    }
    if let Some(rest) = input.strip_prefix("~/") {
        return Ok(PathBuf::from(home()?).join(rest));
    }
    Ok(Path::new(input).to_path_buf())
}
