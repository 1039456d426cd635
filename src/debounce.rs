//! Scan confirmation debounce
//!
//! A camera decoder reports the same barcode many times per second and
//! occasionally misreads it. A candidate is only trusted once the same text has
//! been decoded `confirm_threshold` times in a row.
//!
//! The counters live in a [`Debouncer`] value: [`Debouncer::observe`] consumes
//! the current state and returns the next one together with what happened.

use crate::config::ScanConfig;
use crate::models::{Candidate, Symbology};
use tracing::trace;

/// Outcome of folding one candidate into the debounce state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Wrong length (or failed checksum); state left untouched
    Rejected,
    /// Counted, threshold not reached yet
    Pending {
        /// Consecutive identical reads so far
        repeat_count: u32,
    },
    /// Threshold reached; the counter has been reset to zero
    ThresholdReached(Symbology),
}

/// Two-field debounce state: the last accepted-length candidate and how many
/// times in a row it has been seen since the last reset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Debouncer {
    last_candidate: Option<String>,
    repeat_count: u32,
}

impl Debouncer {
    /// Fresh state with no previous candidate
    pub fn new() -> Self {
        Self::default()
    }

    /// Last candidate that passed the length filter
    pub fn last_candidate(&self) -> Option<&str> {
        self.last_candidate.as_deref()
    }

    /// Consecutive identical candidates since the last reset
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// Fold `candidate` into the state.
    ///
    /// Rejected candidates return `self` unchanged. Reaching the threshold always
    /// resets the count to zero, so it never exceeds `confirm_threshold`. A
    /// threshold below 1 is treated as 1.
    pub fn observe(
        mut self,
        candidate: Candidate<'_>,
        config: &ScanConfig,
    ) -> (Self, Observation) {
        let Some(symbology) = admit(candidate, config) else {
            trace!(
                candidate = candidate.as_str(),
                len = candidate.len(),
                "Rejected candidate"
            );
            return (self, Observation::Rejected);
        };

        if self.last_candidate.as_deref() == Some(candidate.as_str()) {
            self.repeat_count += 1;
        } else {
            self.last_candidate = Some(candidate.as_str().to_owned());
            self.repeat_count = 1;
        }

        // A zero threshold would confirm on no reads at all
        if self.repeat_count >= config.confirm_threshold.max(1) {
            self.repeat_count = 0;
            return (self, Observation::ThresholdReached(symbology));
        }

        let repeat_count = self.repeat_count;
        (self, Observation::Pending { repeat_count })
    }

    /// In-place form of [`Debouncer::observe`]
    pub fn feed(&mut self, candidate: Candidate<'_>, config: &ScanConfig) -> Observation {
        let (next, observation) = std::mem::take(self).observe(candidate, config);
        *self = next;
        observation
    }

    /// Forget the last candidate and zero the count
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn admit(candidate: Candidate<'_>, config: &ScanConfig) -> Option<Symbology> {
    let symbology = candidate.symbology()?;
    if !config.accepts(symbology) {
        return None;
    }
    if config.verify_checksum && !Symbology::verify(candidate.as_str()) {
        return None;
    }
    Some(symbology)
}
