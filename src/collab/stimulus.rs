//! Stimulus window extraction from an injected-current trace.

use serde::{Deserialize, Serialize};

/// Timing and size of the main stimulus in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StimCharacteristics {
    /// Stimulus onset (s).
    pub start_time: f64,
    /// `t[end_idx] - t[start_idx]` (s).
    pub duration: f64,
    /// Current at onset (A).
    pub amplitude: f64,
    pub start_idx: usize,
    pub end_idx: usize,
}

/// Locates the stimulus within a current trace.
pub trait StimulusExtractor: Send + Sync {
    /// `t` holds the sample times of `current`. With `no_test_pulse` the
    /// trace is assumed to carry no calibration pulse before the stimulus.
    /// Returns `None` when no stimulus can be found.
    fn stim_characteristics(&self, current: &[f64], t: &[f64], no_test_pulse: bool) -> Option<StimCharacteristics>;
}

/// Finds stimulus edges where the injected current changes value.
///
/// With a test pulse, its rising and falling edges are the first two changes
/// and are skipped; the stimulus starts one sample after the next change.
/// The stimulus ends one sample after the last change in the trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffStimulusExtractor;

impl StimulusExtractor for DiffStimulusExtractor {
    fn stim_characteristics(&self, current: &[f64], t: &[f64], no_test_pulse: bool) -> Option<StimCharacteristics> {
        let changes: Vec<usize> = current
            .windows(2)
            .enumerate()
            .filter_map(|(k, pair)| (pair[1] != pair[0]).then_some(k))
            .collect();

        let first = if no_test_pulse { 0 } else { 2 };
        let start_idx = changes.get(first)? + 1;
        let end_idx = changes.last()? + 1;

        let start_time = *t.get(start_idx)?;
        let end_time = *t.get(end_idx)?;
        Some(StimCharacteristics {
            start_time,
            duration: end_time - start_time,
            amplitude: current[start_idx],
            start_idx,
            end_idx,
        })
    }
}
