//! simtriage-cli: command-line surface for classifying simulation logs.

use std::path::PathBuf;
use std::sync::OnceLock;

pub mod classify;
pub mod config;
pub mod error;
pub mod logger;
pub mod render;
pub mod signals;

#[cfg(test)]
pub(crate) mod tests_common;

use crate::error::{TriageError, EXIT_OK};

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "simtriage-cli"
}

static VERSION: OnceLock<String> = OnceLock::new();

/// Set the version string for `--version` output.
pub fn set_version(version: &str) {
    let _ = VERSION.set(version.to_string());
}

fn get_version() -> &'static str {
    VERSION.get().map(|s| s.as_str()).unwrap_or("dev")
}

fn help_text() -> String {
    "\
simtriage classifies simulation/build logs into per-run outcomes.

Usage:
  simtriage [flags] <log-file>...
  simtriage [command]

A log file named like a command (rules, signals, help, version, classify)
is only classified through the explicit form:
  simtriage classify <log-file>...

Available Commands:
  classify    Classify every run in one or more log files (default)
  help        Help about any command
  rules       Show the ordered classification rules
  signals     Show the signals detected on each line of a log file
  version     Print the version

Flags:
      --config PATH        Config file (default $XDG_CONFIG_HOME/simtriage/config.yaml)
      --fail-on-failure    Exit 3 when any run is not SUCCESS (zero runs pass)
      --format text|json   Output format
  -h, --help               help for simtriage
      --json               Shorthand for --format json
      --log-file PATH      Append diagnostics to PATH
      --log-level LEVEL    debug, info, warn or error
      --summary            Print per-file outcome counts
  -V, --version            version for simtriage
"
    .to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn ok(stdout: String) -> Self {
        Self {
            stdout,
            stderr: String::new(),
            exit_code: EXIT_OK,
        }
    }

    pub fn from_error(err: &TriageError) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("Error: {err}\n"),
            exit_code: err.exit_code(),
        }
    }
}

/// Line supplier and environment seam for the CLI.
pub trait TriageBackend {
    /// Raw bytes of a log file.
    fn read_log(&self, path: &str) -> std::io::Result<Vec<u8>>;
    /// Config file consulted when `--config` is not given.
    fn default_config_path(&self) -> Option<PathBuf>;
}

pub struct FilesystemTriageBackend;

impl TriageBackend for FilesystemTriageBackend {
    fn read_log(&self, path: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn default_config_path(&self) -> Option<PathBuf> {
        config::default_config_path()
    }
}

pub fn run_cli_for_test(args: &[&str], backend: &dyn TriageBackend) -> CommandOutput {
    let Some((cmd, rest)) = args.split_first() else {
        return CommandOutput::ok(help_text());
    };

    match *cmd {
        "--help" | "-h" | "help" => CommandOutput::ok(help_text()),
        "--version" | "-V" | "version" => {
            CommandOutput::ok(format!("simtriage version {}\n", get_version()))
        }
        "classify" => classify::run_classify(rest, backend),
        "signals" => signals::run_signals(rest, backend),
        "rules" => {
            if let Some(extra) = rest.first() {
                return CommandOutput::from_error(&TriageError::Usage(format!(
                    "rules takes no arguments (got {extra:?})"
                )));
            }
            CommandOutput::ok(render::render_rules())
        }
        _ => classify::run_classify(args, backend),
    }
}

pub fn run_cli(args: &[String], backend: &dyn TriageBackend) -> CommandOutput {
    let refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    run_cli_for_test(&refs, backend)
}

/// Splits raw log bytes into lines. Invalid UTF-8 is replaced rather than
/// rejected. `\r\n`, `\n` and a bare `\r` each end one line; simulators
/// separate progress updates with bare `\r`.
pub fn split_lines(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .replace("\r\n", "\n")
        .split_terminator(|c: char| c == '\r' || c == '\n')
        .map(|line| line.to_string())
        .collect()
}

pub(crate) fn take_flag_value(
    args: &[&str],
    idx: usize,
    flag: &str,
) -> Result<String, TriageError> {
    match args.get(idx) {
        Some(value) if !value.starts_with("--") => Ok((*value).to_string()),
        _ => Err(TriageError::Usage(format!("flag needs an argument: {flag}"))),
    }
}
