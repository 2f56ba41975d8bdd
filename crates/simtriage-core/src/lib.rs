//! simtriage-core: signal detection, run segmentation and outcome
//! classification for simulation/build logs.
//!
//! Detection and classification are pure. Segmentation is a single owned
//! pass over the input lines. Nothing in this crate performs I/O.

pub mod classify;
pub mod report;
pub mod run;
pub mod segment;
pub mod signal;

pub use classify::{classify, explain, Outcome, Verdict};
pub use report::{triage, OutcomeSummary, RunReport};
pub use run::Run;
pub use segment::{segment, SegmentMode};
pub use signal::{detect, Signal, SignalSet};

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "simtriage-core"
}
