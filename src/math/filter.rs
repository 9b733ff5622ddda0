//! Box (moving-average) filter with centered, zero-padded convolution.

use crate::error::FitError;
use crate::math::check_dt;

/// Convert a filter duration to a sample count.
///
/// The ratio `filter_size_s / dt` is rounded to one decimal (half to even) and
/// then to the nearest integer (half to even), so `1.46 → 1.5 → 2` and
/// `2.25 → 2.2 → 2`. The decimal step rounds the exact binary value, so
/// `3.45` (stored just above 3.45) becomes `3.5` and then `4`. Widths below
/// one sample are rejected.
pub fn filter_width(filter_size_s: f64, dt: f64) -> Result<usize, FitError> {
    check_dt(dt)?;
    if !(filter_size_s.is_finite() && filter_size_s > 0.0) {
        return Err(FitError::FilterWidth(format!(
            "filter size must be finite and > 0 s, got {filter_size_s}"
        )));
    }

    let ratio = filter_size_s / dt;
    // Formatting rounds the exact value; scaling by 10 first would not.
    let tenths: f64 = format!("{ratio:.1}")
        .parse()
        .map_err(|e| FitError::FilterWidth(format!("cannot round {ratio} samples: {e}")))?;
    let width = tenths.round_ties_even();
    if width < 1.0 {
        return Err(FitError::FilterWidth(format!(
            "{filter_size_s} s at dt = {dt} s is {ratio:.3} samples, which rounds to {width}"
        )));
    }
    if width > usize::MAX as f64 {
        return Err(FitError::FilterWidth(format!("{width} samples is too wide")));
    }
    Ok(width as usize)
}

/// Uniform kernel of `width` taps, each `1/width`.
pub fn box_kernel(width: usize) -> Vec<f64> {
    vec![1.0 / width as f64; width]
}

/// Convolve `x` with `kernel`, keeping the central `x.len()` samples.
///
/// `out[k] = Σ_m kernel[m] · x[k + (M-1)/2 - m]` with samples outside `x`
/// taken as zero. Requires `kernel.len() <= x.len()`; callers check this.
pub fn convolve_same(x: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = x.len();
    let offset = kernel.len().saturating_sub(1) / 2;
    (0..n)
        .map(|k| {
            let center = k + offset;
            kernel
                .iter()
                .enumerate()
                .filter_map(|(m, &h)| center.checked_sub(m).and_then(|idx| x.get(idx)).map(|&xv| h * xv))
                .sum()
        })
        .collect()
}
