//! Two-parameter fit of R and El with the capacitance held fixed.
//!
//! With `C` known, the injected-current term of the one-step recursion moves
//! to the left-hand side:
//!
//! ```text
//! v[k+1] - i[k]·dt/C = c0·v[k] + c1
//! c0 = 1 - dt/(R·C),  c1 = dt·El/(R·C)
//! ```

use nalgebra::DVector;

use crate::collab::WarningSink;
use crate::domain::{REl, RElFits};
use crate::error::FitError;
use crate::fit::batch::{map_sweeps, warn_non_finite};
use crate::math::{OneStep, check_dt, design_matrix, solve_least_squares};

/// Fit `(R, El)` to every sweep given capacitance `capacitance` (F).
pub fn fit_rel(
    voltages: &[Vec<f64>],
    currents: &[Vec<f64>],
    capacitance: f64,
    dt: f64,
    sink: &dyn WarningSink,
) -> Result<RElFits, FitError> {
    check_dt(dt)?;
    if !(capacitance.is_finite() && capacitance > 0.0) {
        return Err(FitError::InvalidCapacitance(capacitance));
    }

    let fits = map_sweeps(voltages, currents, |idx, voltage, current| {
        let step = OneStep::new(voltage, current)?;
        let ones = vec![1.0; step.len()];
        let x = design_matrix(&[step.voltage, ones.as_slice()]);
        let y = DVector::from_iterator(
            step.len(),
            step.next
                .iter()
                .zip(step.current.iter())
                .map(|(next, i)| next - i * dt / capacitance),
        );
        let c = solve_least_squares(&x, &y)?;

        let fit = invert_known_capacitance(c[0], c[1], capacitance, dt);
        warn_non_finite(sink, idx, &[("R", fit.resistance), ("El", fit.el)]);
        tracing::debug!(sweep = idx, resistance = fit.resistance, el = fit.el, "fitted R, El");
        Ok(fit)
    })?;

    Ok(fits.into_iter().collect())
}

/// Coefficients of `v[k+1] - i[k]·dt/C = c0·v[k] + c1` to `(R, El)`.
pub fn invert_known_capacitance(c0: f64, c1: f64, capacitance: f64, dt: f64) -> REl {
    let resistance = dt / (capacitance * (1.0 - c0));
    let el = capacitance * resistance * c1 / dt;
    REl { resistance, el }
}
