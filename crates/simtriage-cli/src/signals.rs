//! `simtriage signals`: per-line signal dump for checking detection.

use simtriage_core::signal::detect;

use crate::error::TriageError;
use crate::render::render_signal_line;
use crate::{split_lines, CommandOutput, TriageBackend};

const HELP_TEXT_SIGNALS: &str = "\
Show the signals detected on each line of a log file.

Usage:
  simtriage signals [--all] <log-file>

Flags:
      --all   Also list lines that carry no signal
";

pub fn run_signals(args: &[&str], backend: &dyn TriageBackend) -> CommandOutput {
    match execute_signals(args, backend) {
        Ok(output) => output,
        Err(err) => CommandOutput::from_error(&err),
    }
}

fn execute_signals(
    args: &[&str],
    backend: &dyn TriageBackend,
) -> Result<CommandOutput, TriageError> {
    let mut all = false;
    let mut path: Option<&str> = None;
    for token in args {
        match *token {
            "-h" | "--help" => return Ok(CommandOutput::ok(HELP_TEXT_SIGNALS.to_string())),
            "--all" => all = true,
            flag if flag.starts_with("--") => {
                return Err(TriageError::Usage(format!("unknown flag: {flag}")));
            }
            positional => {
                if path.is_some() {
                    return Err(TriageError::Usage(
                        "signals takes exactly one log file".to_string(),
                    ));
                }
                path = Some(positional);
            }
        }
    }
    let Some(path) = path else {
        return Err(TriageError::Usage(
            "signals takes exactly one log file".to_string(),
        ));
    };

    let raw = backend
        .read_log(path)
        .map_err(|err| TriageError::io(path, &err))?;
    let mut out = String::new();
    for (idx, line) in split_lines(&raw).iter().enumerate() {
        let signals = detect(line);
        if signals.is_empty() && !all {
            continue;
        }
        out.push_str(&render_signal_line(idx + 1, &signals, line));
        out.push('\n');
    }
    Ok(CommandOutput::ok(out))
}
