//! Box-filter smoothing of a sweep ahead of the dV/dt regression.
//!
//! The voltage is differenced after smoothing: `v[0..n-1]` and `v[1..n]` are
//! filtered separately and `dV/dt` is their smoothed difference over `dt`.
//! Differencing first and smoothing second gives the same series up to
//! floating-point rounding, since both steps are linear.

use crate::domain::Smoothed;
use crate::error::FitError;
use crate::math::{box_kernel, check_paired, convolve_same, filter_width, lag, lead};

/// Smooth voltage, current and dV/dt with a box filter `filter_size_s` long.
///
/// Every output series has `voltage.len() - 1` samples. Edges are zero-padded,
/// so the first and last `w/2` samples are biased toward zero.
pub fn smooth(voltage: &[f64], current: &[f64], filter_size_s: f64, dt: f64) -> Result<Smoothed, FitError> {
    check_paired(voltage, current)?;
    let width = filter_width(filter_size_s, dt)?;
    if voltage.len() < width + 1 {
        return Err(FitError::SweepTooShort {
            sweep: 0,
            have: voltage.len(),
            need: width + 1,
        });
    }

    let kernel = box_kernel(width);
    let sm_v = convolve_same(lag(voltage), &kernel);
    let sm_vs = convolve_same(lead(voltage), &kernel);
    let sm_i = convolve_same(lag(current), &kernel);

    let dvdt = sm_vs.iter().zip(sm_v.iter()).map(|(next, v)| (next - v) / dt).collect();

    Ok(Smoothed {
        voltage: sm_v,
        current: sm_i,
        dvdt,
    })
}
