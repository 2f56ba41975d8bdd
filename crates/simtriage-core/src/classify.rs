//! Outcome classification.
//!
//! Rules are evaluated in priority order (infrastructure, liveness,
//! functional, success) and the first match wins. Because the liveness rule
//! precedes the functional rule, a run with errors but no completion phrase
//! is a liveness failure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::run::Run;
use crate::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    InfrastructureCrash,
    LivenessFailure,
    FunctionalFailure,
    Success,
    Unknown,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::InfrastructureCrash,
        Outcome::LivenessFailure,
        Outcome::FunctionalFailure,
        Outcome::Success,
        Outcome::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::InfrastructureCrash => "INFRASTRUCTURE_CRASH",
            Outcome::LivenessFailure => "LIVENESS_FAILURE",
            Outcome::FunctionalFailure => "FUNCTIONAL_FAILURE",
            Outcome::Success => "SUCCESS",
            Outcome::Unknown => "UNKNOWN",
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Rule {
    pub name: &'static str,
    pub description: &'static str,
    pub outcome: Outcome,
    matches: fn(&Run) -> bool,
}

impl Rule {
    pub fn matches(&self, run: &Run) -> bool {
        (self.matches)(run)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("outcome", &self.outcome)
            .finish()
    }
}

fn completed(run: &Run) -> bool {
    run.has(Signal::CompleteSuccess) || run.has(Signal::CompleteError)
}

pub static RULES: [Rule; 4] = [
    Rule {
        name: "fatal-line",
        description: "FATAL_LINE seen",
        outcome: Outcome::InfrastructureCrash,
        matches: |run| run.has(Signal::FatalLine),
    },
    Rule {
        name: "no-completion",
        description: "no COMPLETE_SUCCESS, no COMPLETE_ERROR, no FATAL_LINE",
        outcome: Outcome::LivenessFailure,
        matches: |run| !completed(run) && !run.has(Signal::FatalLine),
    },
    Rule {
        name: "functional-failure",
        description: "COMPLETE_ERROR, or COMPLETE_SUCCESS with errors, or any multi-driven net",
        outcome: Outcome::FunctionalFailure,
        matches: |run| {
            run.has(Signal::CompleteError)
                || (run.has(Signal::CompleteSuccess) && run.error_count() > 0)
                || run.multi_driven_count() > 0
        },
    },
    Rule {
        name: "clean-success",
        description: "COMPLETE_SUCCESS with no errors and no multi-driven nets",
        outcome: Outcome::Success,
        matches: |run| {
            run.has(Signal::CompleteSuccess)
                && run.error_count() == 0
                && run.multi_driven_count() == 0
        },
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    /// Name of the rule that fired; `None` for `Outcome::Unknown`.
    pub rule: Option<&'static str>,
}

pub fn explain(run: &Run) -> Verdict {
    RULES
        .iter()
        .find(|rule| rule.matches(run))
        .map(|rule| Verdict {
            outcome: rule.outcome,
            rule: Some(rule.name),
        })
        .unwrap_or(Verdict {
            outcome: Outcome::Unknown,
            rule: None,
        })
}

pub fn classify(run: &Run) -> Outcome {
    explain(run).outcome
}
