//! Three-parameter fit of R, C and El from smoothed dV/dt.
//!
//! Regresses `dV/dt = a0·V + a1·I + a2` on box-filtered series, where for the
//! RC membrane `a0 = -1/(R·C)`, `a1 = 1/C` and `a2 = El/(R·C)`.

use nalgebra::DVector;

use crate::collab::WarningSink;
use crate::domain::{RcEl, RcElFits, SmoothedFit, SmoothedReturn};
use crate::error::FitError;
use crate::fit::batch::{map_sweeps, warn_non_finite};
use crate::fit::smoothing::smooth;
use crate::math::{check_dt, design_matrix, solve_least_squares};

/// Fit `(R, C, El)` to every sweep after smoothing with a `filter_size_s` box filter.
///
/// `_no_rest` is accepted for call-site parity with [`crate::fit::fit_rcel`]
/// and has no effect here.
///
/// With [`SmoothedReturn::LastSweep`] every sweep is still fitted (and can
/// fail), but only the final sweep's parameters are returned; an empty batch
/// is then [`FitError::EmptyBatch`].
pub fn fit_rcel_smoothed(
    voltages: &[Vec<f64>],
    currents: &[Vec<f64>],
    dt: f64,
    filter_size_s: f64,
    _no_rest: bool,
    mode: SmoothedReturn,
    sink: &dyn WarningSink,
) -> Result<SmoothedFit, FitError> {
    check_dt(dt)?;

    let fits: RcElFits = map_sweeps(voltages, currents, |idx, voltage, current| {
        fit_smoothed_sweep(idx, voltage, current, dt, filter_size_s, sink)
    })?
    .into_iter()
    .collect();

    match mode {
        SmoothedReturn::LastSweep => fits.last().map(SmoothedFit::Last).ok_or(FitError::EmptyBatch),
        SmoothedReturn::AllSweeps => Ok(SmoothedFit::All(fits)),
    }
}

fn fit_smoothed_sweep(
    idx: usize,
    voltage: &[f64],
    current: &[f64],
    dt: f64,
    filter_size_s: f64,
    sink: &dyn WarningSink,
) -> Result<RcEl, FitError> {
    let sm = smooth(voltage, current, filter_size_s, dt)?;
    let ones = vec![1.0; sm.voltage.len()];
    let x = design_matrix(&[sm.voltage.as_slice(), sm.current.as_slice(), ones.as_slice()]);
    let y = DVector::from_column_slice(&sm.dvdt);
    let a = solve_least_squares(&x, &y)?;

    let fit = invert_derivative(a[0], a[1], a[2]);
    warn_non_finite(sink, idx, &[("R", fit.resistance), ("C", fit.capacitance), ("El", fit.el)]);
    tracing::debug!(
        sweep = idx,
        resistance = fit.resistance,
        capacitance = fit.capacitance,
        el = fit.el,
        "fitted R, C, El on smoothed sweep"
    );
    Ok(fit)
}

/// Coefficients of `dV/dt = a0·V + a1·I + a2` to `(R, C, El)`.
pub fn invert_derivative(a0: f64, a1: f64, a2: f64) -> RcEl {
    let capacitance = 1.0 / a1;
    let resistance = -1.0 / (capacitance * a0);
    let el = capacitance * resistance * a2;
    RcEl {
        resistance,
        capacitance,
        el,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::CollectingSink;
    use crate::sim::{RcCircuit, noise_current};

    const DT: f64 = 5e-5;

    fn sweep(cell: RcCircuit, seed: u64) -> (Vec<f64>, Vec<f64>) {
        let current = noise_current(2000, 2e-11, 5e-11, seed).unwrap();
        let voltage = cell.simulate(&current, DT, cell.el);
        (voltage, current)
    }

    #[test]
    fn single_sample_filter_recovers_last_sweep() {
        let first = RcCircuit::new(1.5e8, 8e-11, -0.065);
        let last = RcCircuit::new(2e8, 1e-10, -0.07);
        let (v0, i0) = sweep(first, 1);
        let (v1, i1) = sweep(last, 2);

        let sink = CollectingSink::new();
        let out = fit_rcel_smoothed(&[v0, v1], &[i0, i1], DT, DT, false, SmoothedReturn::LastSweep, &sink).unwrap();

        let SmoothedFit::Last(fit) = out else {
            panic!("expected last-sweep output, got {out:?}");
        };
        assert!((fit.resistance / last.r - 1.0).abs() < 1e-6, "{fit:?}");
        assert!((fit.capacitance / last.c - 1.0).abs() < 1e-6, "{fit:?}");
        assert!((fit.el - last.el).abs() < 1e-8, "{fit:?}");
    }

    #[test]
    fn wide_filter_is_exact_when_el_is_zero() {
        // With El = 0 the constant term vanishes, so zero-padded edges stay consistent.
        let cell = RcCircuit::new(2e8, 1e-10, 0.0);
        let (v, i) = sweep(cell, 5);

        let sink = CollectingSink::new();
        let out = fit_rcel_smoothed(&[v], &[i], DT, 10.0 * DT, false, SmoothedReturn::LastSweep, &sink).unwrap();
        let fit = out.last().unwrap();
        assert!((fit.resistance / cell.r - 1.0).abs() < 1e-6, "{fit:?}");
        assert!((fit.capacitance / cell.c - 1.0).abs() < 1e-6, "{fit:?}");
        assert!(fit.el.abs() < 1e-8, "{fit:?}");
    }

    #[test]
    fn all_sweeps_mode_returns_every_sweep_in_order() {
        let cells = [
            RcCircuit::new(1e8, 1e-10, -0.07),
            RcCircuit::new(2e8, 1e-10, -0.07),
            RcCircuit::new(3e8, 1e-10, -0.07),
        ];
        let (voltages, currents): (Vec<_>, Vec<_>) =
            cells.iter().enumerate().map(|(k, &cell)| sweep(cell, 20 + k as u64)).unzip();

        let sink = CollectingSink::new();
        let out = fit_rcel_smoothed(&voltages, &currents, DT, DT, true, SmoothedReturn::AllSweeps, &sink).unwrap();
        let SmoothedFit::All(fits) = out else {
            panic!("expected per-sweep output, got {out:?}");
        };
        assert_eq!(fits.len(), 3);
        for (k, cell) in cells.iter().enumerate() {
            assert!((fits.resistance[k] / cell.r - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_batch() {
        let sink = CollectingSink::new();
        assert_eq!(
            fit_rcel_smoothed(&[], &[], DT, DT, false, SmoothedReturn::LastSweep, &sink),
            Err(FitError::EmptyBatch)
        );
        assert_eq!(
            fit_rcel_smoothed(&[], &[], DT, DT, false, SmoothedReturn::AllSweeps, &sink),
            Ok(SmoothedFit::All(RcElFits::default()))
        );
    }

    #[test]
    fn sub_sample_filter_is_rejected() {
        let (v, i) = sweep(RcCircuit::new(2e8, 1e-10, -0.07), 9);
        let sink = CollectingSink::new();
        let err = fit_rcel_smoothed(&[v], &[i], DT, 0.2 * DT, false, SmoothedReturn::LastSweep, &sink).unwrap_err();
        assert!(matches!(err, FitError::FilterWidth(_)));
    }
}
