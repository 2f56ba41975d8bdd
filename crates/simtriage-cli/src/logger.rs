use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::TriageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!(
                "log level must be one of debug, info, warn, error (got {other:?})"
            )),
        }
    }
}

/// Append-only diagnostics log. Each line is `[<rfc3339>] <LEVEL> <message>`
/// and is flushed as soon as it is written.
pub struct TriageLogger {
    level: LogLevel,
    file: Option<File>,
}

impl TriageLogger {
    pub fn disabled() -> Self {
        Self {
            level: LogLevel::Error,
            file: None,
        }
    }

    pub fn open(path: &Path, level: LogLevel) -> Result<Self, TriageError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| TriageError::io(path.display().to_string(), &err))?;
        Ok(Self {
            level,
            file: Some(file),
        })
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.file.is_some() && level >= self.level
    }

    pub fn log(&mut self, level: LogLevel, message: &str) -> Result<(), TriageError> {
        self.log_at(Utc::now(), level, message)
    }

    pub fn log_at(
        &mut self,
        stamp: DateTime<Utc>,
        level: LogLevel,
        message: &str,
    ) -> Result<(), TriageError> {
        if !self.enabled(level) {
            return Ok(());
        }
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        let stamp = stamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        file.write_all(format!("[{stamp}] {level} {message}\n").as_bytes())
            .and_then(|()| file.flush())
            .map_err(|err| TriageError::Output(format!("write log: {err}")))
    }

    pub fn debug(&mut self, message: &str) -> Result<(), TriageError> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&mut self, message: &str) -> Result<(), TriageError> {
        self.log(LogLevel::Info, message)
    }

    pub fn error(&mut self, message: &str) -> Result<(), TriageError> {
        self.log(LogLevel::Error, message)
    }
}
