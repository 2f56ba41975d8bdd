use std::collections::BTreeMap;

use serde::Serialize;

use crate::classify::{explain, Outcome};
use crate::run::Run;
use crate::segment::{segment_with_stats, Segmentation};
use crate::signal::Signal;

/// Per-run result handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: u32,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
    pub error_count: u32,
    pub multi_driven_count: u32,
    /// Sorted by signal name.
    pub signals: Vec<Signal>,
}

impl RunReport {
    pub fn from_run(run: &Run) -> Self {
        let verdict = explain(run);
        Self {
            run_id: run.run_id(),
            outcome: verdict.outcome,
            rule: verdict.rule,
            error_count: run.error_count(),
            multi_driven_count: run.multi_driven_count(),
            signals: run.signals().iter().copied().collect(),
        }
    }

    pub fn signal_names(&self) -> Vec<&'static str> {
        self.signals.iter().map(|signal| signal.as_str()).collect()
    }
}

/// Segmentation plus classification of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triage {
    pub segmentation: Segmentation,
    pub reports: Vec<RunReport>,
}

pub fn triage_with_segmentation<S: AsRef<str>>(lines: &[S]) -> Triage {
    let segmentation = segment_with_stats(lines);
    let reports = segmentation.runs.iter().map(RunReport::from_run).collect();
    Triage {
        segmentation,
        reports,
    }
}

pub fn triage<S: AsRef<str>>(lines: &[S]) -> Vec<RunReport> {
    triage_with_segmentation(lines).reports
}

/// Count of runs per outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeSummary {
    pub total: usize,
    pub by_outcome: BTreeMap<Outcome, usize>,
}

impl OutcomeSummary {
    pub fn from_reports(reports: &[RunReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.record(report.outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        *self.by_outcome.entry(outcome).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.by_outcome.get(&outcome).copied().unwrap_or(0)
    }

    /// True when no run failed. A summary with zero runs counts as passing,
    /// so `--fail-on-failure` on a log without runs exits 0.
    pub fn all_succeeded(&self) -> bool {
        self.count(Outcome::Success) == self.total
    }

    pub fn merge(&mut self, other: &OutcomeSummary) {
        self.total += other.total;
        for (outcome, count) in &other.by_outcome {
            *self.by_outcome.entry(*outcome).or_insert(0) += count;
        }
    }
}
