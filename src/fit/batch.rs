//! Per-sweep fan-out shared by all fits.

use rayon::prelude::*;

use crate::collab::{SpikeDetector, StimulusExtractor, WarningSink};
use crate::error::FitError;

/// Collaborators a fit may call while processing sweeps.
#[derive(Clone, Copy)]
pub struct FitContext<'a> {
    pub spikes: &'a dyn SpikeDetector,
    pub stimulus: &'a dyn StimulusExtractor,
    pub sink: &'a dyn WarningSink,
}

/// Run `fit` on every `(voltage, current)` pair and collect results in sweep order.
///
/// Sweeps are evaluated in parallel. If several fail, the error of the
/// lowest-indexed sweep is returned, tagged with that index.
pub(crate) fn map_sweeps<T, F>(voltages: &[Vec<f64>], currents: &[Vec<f64>], fit: F) -> Result<Vec<T>, FitError>
where
    T: Send,
    F: Fn(usize, &[f64], &[f64]) -> Result<T, FitError> + Sync,
{
    if voltages.len() != currents.len() {
        return Err(FitError::BatchMismatch {
            voltages: voltages.len(),
            currents: currents.len(),
        });
    }

    let results: Vec<Result<T, FitError>> = voltages
        .par_iter()
        .zip(currents.par_iter())
        .enumerate()
        .map(|(idx, (v, i))| fit(idx, v.as_slice(), i.as_slice()).map_err(|e| e.at_sweep(idx)))
        .collect();

    results.into_iter().collect()
}

/// Warn through `sink` when any fitted parameter is NaN or infinite.
pub(crate) fn warn_non_finite(sink: &dyn WarningSink, idx: usize, values: &[(&str, f64)]) {
    let bad: Vec<String> = values
        .iter()
        .filter(|(_, v)| !v.is_finite())
        .map(|(name, v)| format!("{name}={v}"))
        .collect();
    if !bad.is_empty() {
        sink.warn(&format!(
            "sweep {idx}: non-finite passive parameters ({}); the sweep may be too flat to fit",
            bad.join(", ")
        ));
    }
}
