//! Injected-current waveforms.

use std::ops::Range;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::FitError;

/// Gaussian white-noise current, reproducible for a given `seed`.
pub fn noise_current(n: usize, mean: f64, sigma: f64, seed: u64) -> Result<Vec<f64>, FitError> {
    let normal = Normal::new(mean, sigma).map_err(|e| FitError::Config(format!("noise distribution error: {e}")))?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n).map(|_| normal.sample(&mut rng)).collect())
}

/// Zero current with `amplitude` over `window`.
///
/// The window is clipped to the trace.
pub fn step_current(n: usize, window: Range<usize>, amplitude: f64) -> Vec<f64> {
    let mut current = vec![0.0; n];
    add_step(&mut current, window, amplitude);
    current
}

/// Add `amplitude` to every sample of `current` in `window`.
pub fn add_step(current: &mut [f64], window: Range<usize>, amplitude: f64) {
    let end = window.end.min(current.len());
    let start = window.start.min(end);
    for x in &mut current[start..end] {
        *x += amplitude;
    }
}
