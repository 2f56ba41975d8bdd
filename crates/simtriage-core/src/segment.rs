//! Run segmentation.
//!
//! Lines are grouped into runs in one of two modes. Explicit mode applies
//! when any line of the input carries `RUN_START`; each marker closes the
//! open run and opens the next one, and lines before the first marker are
//! preamble. Implicit mode treats the whole input as at most one run, opened
//! by the first line that is not simulation-start noise.
//!
//! The mode depends on the whole input, so `segment` pre-scans every line
//! before opening a run. Streaming callers must buffer the input or know the
//! mode up front and drive a `Segmenter` directly.

use crate::run::Run;
use crate::signal::{detect, Signal, SignalSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMode {
    Explicit,
    Implicit,
}

impl SegmentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentMode::Explicit => "explicit",
            SegmentMode::Implicit => "implicit",
        }
    }
}

/// What the segmenter did with one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDisposition {
    /// Simulation-start noise without a run marker.
    Noise,
    /// Run marker; a new run was opened.
    Boundary,
    /// Explicit mode, before the first run marker.
    Preamble,
    /// Facts folded into the open run.
    Collected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    pub lines_seen: usize,
    pub noise_discarded: usize,
    pub preamble_discarded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub mode: SegmentMode,
    pub runs: Vec<Run>,
    pub stats: SegmentStats,
}

/// Pre-scan: explicit iff any line carries `RUN_START`.
pub fn detect_mode<S: AsRef<str>>(lines: &[S]) -> SegmentMode {
    let has_explicit_runs = lines
        .iter()
        .any(|line| detect(line.as_ref()).contains(&Signal::RunStart));
    if has_explicit_runs {
        SegmentMode::Explicit
    } else {
        SegmentMode::Implicit
    }
}

/// Per-pass accumulator. Owns the open run and the finalized runs.
#[derive(Debug, Clone)]
pub struct Segmenter {
    mode: SegmentMode,
    current: Option<Run>,
    last_run_id: u32,
    runs: Vec<Run>,
    stats: SegmentStats,
}

impl Segmenter {
    pub fn new(mode: SegmentMode) -> Self {
        Self {
            mode,
            current: None,
            last_run_id: 0,
            runs: Vec::new(),
            stats: SegmentStats::default(),
        }
    }

    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    pub fn feed(&mut self, line: &str) -> LineDisposition {
        self.stats.lines_seen += 1;
        let signals = detect(line);
        self.feed_signals(&signals)
    }

    fn feed_signals(&mut self, signals: &SignalSet) -> LineDisposition {
        let run_start = signals.contains(&Signal::RunStart);

        if signals.contains(&Signal::StartSimulation) && !run_start {
            self.stats.noise_discarded += 1;
            return LineDisposition::Noise;
        }

        if run_start {
            let mut run = self.open_run();
            run.tag(Signal::RunStart);
            self.current = Some(run);
            return LineDisposition::Boundary;
        }

        if self.current.is_none() {
            match self.mode {
                SegmentMode::Implicit => {
                    let run = self.open_run();
                    self.current = Some(run);
                }
                SegmentMode::Explicit => {
                    self.stats.preamble_discarded += 1;
                    return LineDisposition::Preamble;
                }
            }
        }

        if let Some(run) = self.current.as_mut() {
            run.absorb(signals);
        }
        LineDisposition::Collected
    }

    /// Closes the open run, if any, and returns a fresh one with the next id.
    fn open_run(&mut self) -> Run {
        if let Some(finished) = self.current.take() {
            self.runs.push(finished);
        }
        self.last_run_id += 1;
        Run::new(self.last_run_id)
    }

    pub fn finish(mut self) -> Segmentation {
        if let Some(finished) = self.current.take() {
            self.runs.push(finished);
        }
        Segmentation {
            mode: self.mode,
            runs: self.runs,
            stats: self.stats,
        }
    }
}

pub fn segment_with_stats<S: AsRef<str>>(lines: &[S]) -> Segmentation {
    let mut segmenter = Segmenter::new(detect_mode(lines));
    for line in lines {
        segmenter.feed(line.as_ref());
    }
    segmenter.finish()
}

pub fn segment<S: AsRef<str>>(lines: &[S]) -> Vec<Run> {
    segment_with_stats(lines).runs
}
