use serde::Serialize;
use simtriage_core::classify::{Outcome, RULES};
use simtriage_core::report::{OutcomeSummary, RunReport};
use simtriage_core::signal::SignalSet;

use crate::error::TriageError;

/// One input file after triage, as emitted by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub runs: Vec<RunReport>,
    pub summary: OutcomeSummary,
}

pub fn render_run_line(report: &RunReport) -> String {
    format!(
        "Run {} | Outcome: {} | Errors: {} | Multi-driven nets: {} | Signals: [{}]",
        report.run_id,
        report.outcome,
        report.error_count,
        report.multi_driven_count,
        report
            .signal_names()
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

pub fn render_summary_line(summary: &OutcomeSummary) -> String {
    let parts: Vec<String> = Outcome::ALL
        .into_iter()
        .filter_map(|outcome| match summary.count(outcome) {
            0 => None,
            count => Some(format!("{outcome}={count}")),
        })
        .collect();
    if parts.is_empty() {
        return format!("Summary: runs={}", summary.total);
    }
    format!("Summary: runs={} {}", summary.total, parts.join(" "))
}

pub fn write_text(out: &mut String, files: &[FileReport], summary: bool) {
    let headers = files.len() > 1;
    for (idx, file) in files.iter().enumerate() {
        if headers {
            if idx > 0 {
                out.push('\n');
            }
            out.push_str(&format!("==> {} <==\n", file.path));
        }
        for report in &file.runs {
            out.push_str(&render_run_line(report));
            out.push('\n');
        }
        if summary {
            out.push_str(&render_summary_line(&file.summary));
            out.push('\n');
        }
    }
}

pub fn write_json(out: &mut String, files: &[FileReport]) -> Result<(), TriageError> {
    let encoded = serde_json::to_string_pretty(files)
        .map_err(|err| TriageError::Output(format!("encode report: {err}")))?;
    out.push_str(&encoded);
    out.push('\n');
    Ok(())
}

pub fn render_signal_line(line_no: usize, signals: &SignalSet, line: &str) -> String {
    let names: Vec<&str> = signals.iter().map(|signal| signal.as_str()).collect();
    format!("{line_no:>6}  [{}]  {line}", names.join(", "))
}

pub fn render_rules() -> String {
    let mut out = String::new();
    for (idx, rule) in RULES.iter().enumerate() {
        out.push_str(&format!(
            "{}. {:<20} {:<22} {}\n",
            idx + 1,
            rule.name,
            rule.outcome.as_str(),
            rule.description
        ));
    }
    out.push_str(&format!(
        "-  {:<20} {:<22} no rule matched\n",
        "(fallback)",
        Outcome::Unknown.as_str()
    ));
    out
}
