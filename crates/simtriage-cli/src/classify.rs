//! `simtriage classify`: segment and classify every run in each log file.

use simtriage_core::classify::Outcome;
use simtriage_core::report::{triage_with_segmentation, OutcomeSummary};

use crate::config::{load_config, Config, OutputFormat};
use crate::error::{TriageError, EXIT_OK, EXIT_RUN_FAILED};
use crate::logger::{LogLevel, TriageLogger};
use crate::render::{write_json, write_text, FileReport};
use crate::{split_lines, take_flag_value, CommandOutput, TriageBackend};

const HELP_TEXT_CLASSIFY: &str = "\
Classify every run in one or more log files.

Usage:
  simtriage classify [flags] <log-file>...

Flags:
      --config PATH        Config file
      --fail-on-failure    Exit 3 when any run is not SUCCESS (zero runs pass)
      --format text|json   Output format
      --json               Shorthand for --format json
      --log-file PATH      Append diagnostics to PATH
      --log-level LEVEL    debug, info, warn or error
      --summary            Print per-file outcome counts
";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ClassifyArgs {
    paths: Vec<String>,
    format: Option<OutputFormat>,
    summary: bool,
    config: Option<String>,
    log_file: Option<String>,
    log_level: Option<LogLevel>,
    fail_on_failure: bool,
    help: bool,
}

pub fn run_classify(args: &[&str], backend: &dyn TriageBackend) -> CommandOutput {
    match execute_classify(args, backend) {
        Ok(output) => output,
        Err(err) => CommandOutput::from_error(&err),
    }
}

fn execute_classify(
    args: &[&str],
    backend: &dyn TriageBackend,
) -> Result<CommandOutput, TriageError> {
    let parsed = parse_classify_args(args)?;
    if parsed.help {
        return Ok(CommandOutput::ok(HELP_TEXT_CLASSIFY.to_string()));
    }
    if parsed.paths.is_empty() {
        return Err(TriageError::Usage(
            "classify needs at least one log file".to_string(),
        ));
    }

    let (cfg, config_source) =
        load_config(parsed.config.as_deref(), backend.default_config_path())?;
    let cfg = apply_flags(cfg, &parsed)?;
    let mut logger = match &cfg.logging.file {
        Some(path) => TriageLogger::open(path, cfg.logging.level)?,
        None => TriageLogger::disabled(),
    };
    match &config_source {
        Some(path) => logger.debug(&format!("config loaded from {}", path.display()))?,
        None => logger.debug("config: built-in defaults")?,
    }

    // Every input is read before any segmentation starts.
    let mut inputs = Vec::with_capacity(parsed.paths.len());
    for path in &parsed.paths {
        match backend.read_log(path) {
            Ok(raw) => inputs.push((path.clone(), split_lines(&raw))),
            Err(err) => {
                let err = TriageError::io(path.clone(), &err);
                logger.error(&err.to_string())?;
                return Err(err);
            }
        }
    }

    let mut files = Vec::with_capacity(inputs.len());
    let mut overall = OutcomeSummary::default();
    for (path, lines) in inputs {
        let triage = triage_with_segmentation(&lines);
        let stats = triage.segmentation.stats;
        logger.info(&format!(
            "{path}: {} lines, {} mode, {} runs",
            stats.lines_seen,
            triage.segmentation.mode.as_str(),
            triage.reports.len()
        ))?;
        logger.debug(&format!(
            "{path}: discarded {} noise and {} preamble lines",
            stats.noise_discarded, stats.preamble_discarded
        ))?;
        for report in &triage.reports {
            logger.debug(&format!(
                "{path}: run {} -> {} (rule {})",
                report.run_id,
                report.outcome,
                report.rule.unwrap_or("none")
            ))?;
        }

        let summary = OutcomeSummary::from_reports(&triage.reports);
        overall.merge(&summary);
        files.push(FileReport {
            path,
            runs: triage.reports,
            summary,
        });
    }

    let mut stdout = String::new();
    match cfg.output.format {
        OutputFormat::Text => write_text(&mut stdout, &files, cfg.output.summary),
        OutputFormat::Json => write_json(&mut stdout, &files)?,
    }

    let exit_code = if parsed.fail_on_failure && !overall.all_succeeded() {
        logger.info(&format!(
            "{} of {} runs did not succeed",
            overall.total - overall.count(Outcome::Success),
            overall.total
        ))?;
        EXIT_RUN_FAILED
    } else {
        EXIT_OK
    };

    Ok(CommandOutput {
        stdout,
        stderr: String::new(),
        exit_code,
    })
}

fn apply_flags(mut cfg: Config, parsed: &ClassifyArgs) -> Result<Config, TriageError> {
    if let Some(format) = parsed.format {
        cfg.output.format = format;
    }
    if parsed.summary {
        cfg.output.summary = true;
    }
    if let Some(level) = parsed.log_level {
        cfg.logging.level = level;
    }
    if let Some(file) = &parsed.log_file {
        cfg.logging.file = Some(crate::config::expand_tilde(file.trim())?);
    }
    Ok(cfg)
}

fn parse_classify_args(args: &[&str]) -> Result<ClassifyArgs, TriageError> {
    let mut parsed = ClassifyArgs::default();

    let mut idx = 0usize;
    while idx < args.len() {
        let token = args[idx];
        match token {
            "-h" | "--help" => parsed.help = true,
            "--json" => parsed.format = Some(OutputFormat::Json),
            "--format" => {
                idx += 1;
                let raw = take_flag_value(args, idx, "--format")?;
                parsed.format = Some(raw.parse().map_err(TriageError::Usage)?);
            }
            "--summary" => parsed.summary = true,
            "--fail-on-failure" => parsed.fail_on_failure = true,
            "--config" => {
                idx += 1;
                parsed.config = Some(take_flag_value(args, idx, "--config")?);
            }
            "--log-file" => {
                idx += 1;
                parsed.log_file = Some(take_flag_value(args, idx, "--log-file")?);
            }
            "--log-level" => {
                idx += 1;
                let raw = take_flag_value(args, idx, "--log-level")?;
                parsed.log_level = Some(raw.parse().map_err(TriageError::Usage)?);
            }
            flag if flag.starts_with("--") => {
                return Err(TriageError::Usage(format!("unknown flag: {flag}")));
            }
            path => parsed.paths.push(path.to_string()),
        }
        idx += 1;
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::{parse_classify_args, run_classify};
    use crate::config::OutputFormat;
    use crate::logger::LogLevel;
    use crate::tests_common::MemoryBackend;

    #[test]
    fn parses_flags_and_paths() {
        let parsed = match parse_classify_args(&[
            "--format",
            "json",
            "a.log",
            "--summary",
            "--log-level",
            "debug",
            "b.log",
            "--fail-on-failure",
        ]) {
            Ok(parsed) => parsed,
            Err(err) => panic!("parse: {err}"),
        };
        assert_eq!(parsed.paths, vec!["a.log", "b.log"]);
        assert_eq!(parsed.format, Some(OutputFormat::Json));
        assert_eq!(parsed.log_level, Some(LogLevel::Debug));
        assert!(parsed.summary);
        assert!(parsed.fail_on_failure);
    }

    #[test]
    fn rejects_unknown_flag_and_missing_values() {
        assert!(parse_classify_args(&["--bogus"]).is_err());
        assert!(parse_classify_args(&["--format"]).is_err());
        assert!(parse_classify_args(&["--format", "xml"]).is_err());
        assert!(parse_classify_args(&["--config", "--json"]).is_err());
    }

    #[test]
    fn single_dash_path_is_positional() {
        match parse_classify_args(&["-"]) {
            Ok(parsed) => assert_eq!(parsed.paths, vec!["-"]),
            Err(err) => panic!("parse: {err}"),
        }
    }

    #[test]
    fn classifies_one_file_in_driver_format() {
        let backend = MemoryBackend::new().with_log(
            "sim.log",
            &["Running test: A", "error: bad net", "completed with errors"],
        );
        let out = run_classify(&["sim.log"], &backend);
        assert_eq!(out.exit_code, 0, "stderr={}", out.stderr);
        assert_eq!(
            out.stdout,
            "Run 1 | Outcome: FUNCTIONAL_FAILURE | Errors: 1 | Multi-driven nets: 0 | \
             Signals: ['COMPLETE_ERROR', 'ERROR_LINE', 'RUN_START']\n"
        );
    }

    #[test]
    fn missing_file_is_fatal() {
        let backend = MemoryBackend::new().with_log("ok.log", &["completed successfully"]);
        let out = run_classify(&["ok.log", "missing.log"], &backend);
        assert_eq!(out.exit_code, 1);
        assert!(out.stdout.is_empty());
        assert_eq!(out.stderr, "Error: read missing.log: no such file\n");
    }

    #[test]
    fn no_paths_is_usage_error() {
        let out = run_classify(&["--summary"], &MemoryBackend::new());
        assert_eq!(out.exit_code, 2);
        assert!(out.stderr.contains("at least one log file"));
    }

    #[test]
    fn fail_on_failure_sets_exit_code() {
        let backend = MemoryBackend::new()
            .with_log("pass.log", &["completed successfully"])
            .with_log("hang.log", &["Running test: t", "ERROR: stuck"]);

        let out = run_classify(&["--fail-on-failure", "pass.log"], &backend);
        assert_eq!(out.exit_code, 0);

        let out = run_classify(&["--fail-on-failure", "pass.log", "hang.log"], &backend);
        assert_eq!(out.exit_code, 3);
        assert!(out.stdout.contains("==> hang.log <=="));
        assert!(out.stdout.contains("Outcome: LIVENESS_FAILURE"));
    }

    #[test]
    fn fail_on_failure_passes_log_without_runs() {
        let backend = MemoryBackend::new().with_raw("empty.log", b"");
        let out = run_classify(&["--fail-on-failure", "--summary", "empty.log"], &backend);
        assert_eq!(out.exit_code, 0, "stderr={}", out.stderr);
        assert_eq!(out.stdout, "Summary: runs=0\n");
    }

    #[test]
    fn help_flag_prints_command_help() {
        let out = run_classify(&["--help"], &MemoryBackend::new());
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.starts_with("Classify every run"));
    }
}
