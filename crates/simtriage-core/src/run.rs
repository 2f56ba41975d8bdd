use crate::signal::{Signal, SignalSet};

/// Facts accumulated for one logical execution unit.
///
/// Only the segmenter mutates a run; runs handed out by it are read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    run_id: u32,
    signals: SignalSet,
    error_count: u32,
    multi_driven_count: u32,
}

impl Run {
    pub fn new(run_id: u32) -> Self {
        Self {
            run_id,
            signals: SignalSet::new(),
            error_count: 0,
            multi_driven_count: 0,
        }
    }

    /// Builds a finished run from already-known facts.
    pub fn with_facts(
        run_id: u32,
        signals: impl IntoIterator<Item = Signal>,
        error_count: u32,
        multi_driven_count: u32,
    ) -> Self {
        Self {
            run_id,
            signals: signals.into_iter().collect(),
            error_count,
            multi_driven_count,
        }
    }

    pub fn run_id(&self) -> u32 {
        self.run_id
    }

    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }

    pub fn has(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn multi_driven_count(&self) -> u32 {
        self.multi_driven_count
    }

    pub(crate) fn tag(&mut self, signal: Signal) {
        self.signals.insert(signal);
    }

    /// Folds one line's signals into the run. Counters move once per
    /// occurrence, independently of set membership.
    pub(crate) fn absorb(&mut self, signals: &SignalSet) {
        for signal in signals {
            self.signals.insert(*signal);
            match signal {
                Signal::ErrorLine => self.error_count = self.error_count.saturating_add(1),
                Signal::MultiDrivenNet => {
                    self.multi_driven_count = self.multi_driven_count.saturating_add(1)
                }
                _ => {}
            }
        }
    }
}
