//! Index windows over sampled series.
//!
//! All three fits align a series against itself shifted by one sample, and the
//! unsmoothed fit additionally crops to a stimulus window. Going through these
//! helpers keeps those index conventions in one place.

use crate::error::FitError;

/// Every sample except the last: `x[0..n-1]`.
pub fn lag(x: &[f64]) -> &[f64] {
    &x[..x.len().saturating_sub(1)]
}

/// Every sample except the first: `x[1..n]`.
pub fn lead(x: &[f64]) -> &[f64] {
    x.get(1..).unwrap_or(&[])
}

/// `x[start..start + len]`, or `None` if the window leaves the series.
pub fn crop(x: &[f64], start: usize, len: usize) -> Option<&[f64]> {
    let end = start.checked_add(len)?;
    x.get(start..end)
}

/// Fail unless `dt` is a finite, positive sample interval.
pub fn check_dt(dt: f64) -> Result<(), FitError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(FitError::InvalidTimeStep(dt))
    }
}

/// Fail unless a sweep's voltage and current have the same length.
pub fn check_paired(voltage: &[f64], current: &[f64]) -> Result<(), FitError> {
    if voltage.len() == current.len() {
        Ok(())
    } else {
        Err(FitError::LengthMismatch {
            sweep: 0,
            voltage: voltage.len(),
            current: current.len(),
        })
    }
}

/// One-step-ahead alignment of a sweep.
///
/// `voltage[k]` and `current[k]` predict `next[k]`, the voltage one sample later.
#[derive(Debug, Clone, Copy)]
pub struct OneStep<'a> {
    pub voltage: &'a [f64],
    pub current: &'a [f64],
    pub next: &'a [f64],
}

impl<'a> OneStep<'a> {
    /// Align a paired sweep. Requires equal lengths and at least two samples.
    pub fn new(voltage: &'a [f64], current: &'a [f64]) -> Result<Self, FitError> {
        check_paired(voltage, current)?;
        if voltage.len() < 2 {
            return Err(FitError::SweepTooShort {
                sweep: 0,
                have: voltage.len(),
                need: 2,
            });
        }
        Ok(Self {
            voltage: lag(voltage),
            current: lag(current),
            next: lead(voltage),
        })
    }

    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }
}
