//! Line-level signal detection.
//!
//! Every line is tested against a fixed table of case-insensitive patterns.
//! Patterns are independent, so a single line can carry several signals.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Named semantic category detected in one line of log text.
///
/// Variants are declared in name order so the derived `Ord` (and therefore
/// `SignalSet` iteration) matches sorting by canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    CompleteError,
    CompleteSuccess,
    ErrorLine,
    FatalLine,
    MultiDrivenNet,
    RunStart,
    StartSimulation,
    TimingViolation,
}

/// Deduplicated signals, iterated in name order.
pub type SignalSet = BTreeSet<Signal>;

impl Signal {
    pub const ALL: [Signal; 8] = [
        Signal::CompleteError,
        Signal::CompleteSuccess,
        Signal::ErrorLine,
        Signal::FatalLine,
        Signal::MultiDrivenNet,
        Signal::RunStart,
        Signal::StartSimulation,
        Signal::TimingViolation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::CompleteError => "COMPLETE_ERROR",
            Signal::CompleteSuccess => "COMPLETE_SUCCESS",
            Signal::ErrorLine => "ERROR_LINE",
            Signal::FatalLine => "FATAL_LINE",
            Signal::MultiDrivenNet => "MULTI_DRIVEN_NET",
            Signal::RunStart => "RUN_START",
            Signal::StartSimulation => "START_SIMULATION",
            Signal::TimingViolation => "TIMING_VIOLATION",
        }
    }

    /// Regex source used to detect this signal. All patterns are compiled
    /// case-insensitive.
    pub fn pattern(self) -> &'static str {
        match self {
            Signal::StartSimulation => r"(starting|running)\s+simulation",
            Signal::RunStart => r"running\s+test\s*:",
            Signal::ErrorLine => r"^\s*error\b",
            Signal::FatalLine => r"\bfatal\b|\bsegmentation\s+fault\b",
            Signal::CompleteSuccess => r"completed\s+successfully",
            Signal::CompleteError => r"completed\s+with\s+errors",
            Signal::MultiDrivenNet => {
                r"\b(multi[-\s]?driven\s+net|multiple\s+drivers|more\s+than\s+one\s+driver)\b"
            }
            Signal::TimingViolation => r"(setup|hold)\s+violation",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Signal::ALL
            .into_iter()
            .find(|signal| signal.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown signal: {wanted:?}"))
    }
}

struct SignalPattern {
    signal: Signal,
    regex: Regex,
}

static PATTERN_TABLE: OnceLock<Vec<SignalPattern>> = OnceLock::new();

fn pattern_table() -> &'static [SignalPattern] {
    PATTERN_TABLE.get_or_init(|| {
        Signal::ALL
            .into_iter()
            .filter_map(|signal| {
                // Sources are constants; `every_signal_pattern_compiles` pins them.
                let regex = Regex::new(&format!("(?i){}", signal.pattern())).ok()?;
                Some(SignalPattern { signal, regex })
            })
            .collect()
    })
}

/// Returns every signal whose pattern matches somewhere in `line`.
pub fn detect(line: &str) -> SignalSet {
    pattern_table()
        .iter()
        .filter(|entry| entry.regex.is_match(line))
        .map(|entry| entry.signal)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{detect, pattern_table, Signal, SignalSet};

    fn set(signals: &[Signal]) -> SignalSet {
        signals.iter().copied().collect()
    }

    #[test]
    fn every_signal_pattern_compiles() {
        assert_eq!(pattern_table().len(), Signal::ALL.len());
    }

    #[test]
    fn plain_line_has_no_signals() {
        assert!(detect("").is_empty());
        assert!(detect("INFO: elaborating design top").is_empty());
    }

    #[test]
    fn completion_phrases_are_case_insensitive() {
        assert_eq!(
            detect("Simulation COMPLETED SUCCESSFULLY"),
            set(&[Signal::CompleteSuccess])
        );
        assert_eq!(
            detect("run completed   with errors"),
            set(&[Signal::CompleteError])
        );
    }

    #[test]
    fn error_line_is_anchored_to_line_start() {
        assert_eq!(detect("ERROR: [VRFC 10-91] x"), set(&[Signal::ErrorLine]));
        assert_eq!(detect("   error: bad net"), set(&[Signal::ErrorLine]));
        assert!(detect("there was an error here").is_empty());
        assert!(detect("errors: 0").is_empty());
    }

    #[test]
    fn fatal_matches_word_or_segfault() {
        assert_eq!(detect("FATAL_ERROR: Iteration limit"), SignalSet::new());
        assert_eq!(detect("Fatal: out of memory"), set(&[Signal::FatalLine]));
        assert_eq!(
            detect("xsimk received Segmentation   Fault"),
            set(&[Signal::FatalLine])
        );
    }

    #[test]
    fn multi_driven_variants() {
        for line in [
            "Net /top/bus is multi-driven net",
            "WARNING: multidriven net found",
            "multi driven net q",
            "signal has multiple drivers",
            "more than one driver on net clk",
        ] {
            assert_eq!(detect(line), set(&[Signal::MultiDrivenNet]), "line={line}");
        }
    }

    #[test]
    fn run_start_and_simulation_start() {
        assert_eq!(detect("Running test: smoke"), set(&[Signal::RunStart]));
        assert_eq!(detect("running test :alu"), set(&[Signal::RunStart]));
        assert_eq!(
            detect("Starting simulation of tb_top"),
            set(&[Signal::StartSimulation])
        );
        assert_eq!(
            detect("Running simulation; running test: a"),
            set(&[Signal::StartSimulation, Signal::RunStart])
        );
    }

    #[test]
    fn one_line_can_carry_several_signals() {
        let got = detect("Error: setup violation then completed with errors");
        assert_eq!(
            got,
            set(&[
                Signal::ErrorLine,
                Signal::TimingViolation,
                Signal::CompleteError
            ])
        );
    }

    #[test]
    fn detection_does_not_depend_on_pattern_order() {
        let lines = [
            "error: hold violation, fatal",
            "Running test: t -- Error: multiple drivers",
            "completed successfully with errors",
            "$finish called; segmentation fault",
            "plain text",
        ];
        for line in lines {
            let reversed: SignalSet = pattern_table()
                .iter()
                .rev()
                .filter(|pattern| pattern.regex.is_match(line))
                .map(|pattern| pattern.signal)
                .collect();
            assert_eq!(detect(line), reversed, "line={line}");
            assert_eq!(detect(line), detect(line), "line={line}");
        }
    }

    #[test]
    fn signal_names_round_trip_through_from_str() {
        for signal in Signal::ALL {
            assert_eq!(signal.as_str().parse::<Signal>(), Ok(signal));
        }
        assert_eq!("run_start".parse::<Signal>(), Ok(Signal::RunStart));
        assert!("NOT_A_SIGNAL".parse::<Signal>().is_err());
    }

    #[test]
    fn set_iterates_in_name_order() {
        let names: Vec<&str> = detect("Error: multiple drivers; completed successfully")
            .into_iter()
            .map(Signal::as_str)
            .collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
