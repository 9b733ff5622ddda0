//! Three-parameter fit of R, C and El from one-step-ahead voltage prediction.
//!
//! Forward-Euler discretization of the RC membrane gives
//!
//! ```text
//! v[k+1] = b0·v[k] + b1·i[k] + b2
//! b0 = 1 - dt/(R·C),  b1 = dt/C,  b2 = dt·El/(R·C)
//! ```
//!
//! so a linear regression of `v[k+1]` on `[v[k], i[k], 1]` inverts directly to
//! the physical parameters.

use nalgebra::DVector;

use crate::domain::{RcEl, RcElFits};
use crate::error::FitError;
use crate::fit::batch::{FitContext, map_sweeps, warn_non_finite};
use crate::math::{OneStep, check_dt, check_paired, crop, design_matrix, solve_least_squares};

/// Fit `(R, C, El)` to every sweep.
///
/// Sweeps with detected spikes are still fitted; a warning goes to
/// `ctx.sink`. With `no_rest`, each sweep is first cropped to the stimulus
/// window reported by `ctx.stimulus` (queried in no-test-pulse mode).
pub fn fit_rcel(
    voltages: &[Vec<f64>],
    currents: &[Vec<f64>],
    dt: f64,
    no_rest: bool,
    ctx: FitContext<'_>,
) -> Result<RcElFits, FitError> {
    check_dt(dt)?;
    let fits = map_sweeps(voltages, currents, |idx, voltage, current| {
        fit_rcel_sweep(idx, voltage, current, dt, no_rest, ctx)
    })?;
    Ok(fits.into_iter().collect())
}

fn fit_rcel_sweep(
    idx: usize,
    voltage: &[f64],
    current: &[f64],
    dt: f64,
    no_rest: bool,
    ctx: FitContext<'_>,
) -> Result<RcEl, FitError> {
    check_paired(voltage, current)?;

    let spikes = ctx.spikes.find_spikes(voltage, dt);
    if !spikes.is_empty() {
        ctx.sink.warn(&format!(
            "sweep {idx}: spike in subthreshold noise ({} detected); continuing with least squares",
            spikes.len()
        ));
    }

    let (voltage, current) = if no_rest {
        stimulus_window(voltage, current, dt, ctx)?
    } else {
        (voltage, current)
    };

    let step = OneStep::new(voltage, current)?;
    let ones = vec![1.0; step.len()];
    let x = design_matrix(&[step.voltage, step.current, ones.as_slice()]);
    let y = DVector::from_column_slice(step.next);
    let b = solve_least_squares(&x, &y)?;

    let fit = invert_one_step(b[0], b[1], b[2], dt);
    warn_non_finite(
        ctx.sink,
        idx,
        &[("R", fit.resistance), ("C", fit.capacitance), ("El", fit.el)],
    );
    tracing::debug!(
        sweep = idx,
        resistance = fit.resistance,
        capacitance = fit.capacitance,
        el = fit.el,
        "fitted R, C, El"
    );
    Ok(fit)
}

/// Crop a sweep to `[start, start + (end - start))` as reported by the extractor.
fn stimulus_window<'a>(
    voltage: &'a [f64],
    current: &'a [f64],
    dt: f64,
    ctx: FitContext<'_>,
) -> Result<(&'a [f64], &'a [f64]), FitError> {
    let t: Vec<f64> = (0..current.len()).map(|k| k as f64 * dt).collect();
    let stim = ctx
        .stimulus
        .stim_characteristics(current, &t, true)
        .ok_or_else(|| FitError::NoStimulus {
            sweep: 0,
            reason: "no stimulus found in current trace".to_string(),
        })?;

    let duration = stim.end_idx.checked_sub(stim.start_idx).ok_or_else(|| FitError::NoStimulus {
        sweep: 0,
        reason: format!("stimulus ends (sample {}) before it starts (sample {})", stim.end_idx, stim.start_idx),
    })?;

    let outside = || FitError::NoStimulus {
        sweep: 0,
        reason: format!(
            "stimulus window {}..{} lies outside the {}-sample sweep",
            stim.start_idx,
            stim.start_idx + duration,
            voltage.len()
        ),
    };
    let v = crop(voltage, stim.start_idx, duration).ok_or_else(outside)?;
    let i = crop(current, stim.start_idx, duration).ok_or_else(outside)?;
    Ok((v, i))
}

/// Coefficients of `v[k+1] = b0·v[k] + b1·i[k] + b2` to `(R, C, El)`.
pub fn invert_one_step(b0: f64, b1: f64, b2: f64, dt: f64) -> RcEl {
    let capacitance = dt / b1;
    let resistance = dt / (capacitance * (1.0 - b0));
    let el = capacitance * resistance * b2 / dt;
    RcEl {
        resistance,
        capacitance,
        el,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{CollectingSink, DiffStimulusExtractor, DvDtSpikeDetector, StimCharacteristics, StimulusExtractor};
    use crate::sim::{RcCircuit, noise_current};

    const DT: f64 = 5e-5;

    struct FixedWindow(usize, usize);

    impl StimulusExtractor for FixedWindow {
        fn stim_characteristics(&self, _current: &[f64], t: &[f64], _no_test_pulse: bool) -> Option<StimCharacteristics> {
            Some(StimCharacteristics {
                start_time: t[self.0],
                duration: t[self.1] - t[self.0],
                amplitude: 0.0,
                start_idx: self.0,
                end_idx: self.1,
            })
        }
    }

    fn sweep(cell: RcCircuit, seed: u64) -> (Vec<f64>, Vec<f64>) {
        let current = noise_current(2000, 2e-11, 5e-11, seed).unwrap();
        let voltage = cell.simulate(&current, DT, cell.el);
        (voltage, current)
    }

    fn assert_recovers(fit: RcEl, cell: RcCircuit) {
        assert!((fit.resistance / cell.r - 1.0).abs() < 1e-6, "R {fit:?}");
        assert!((fit.capacitance / cell.c - 1.0).abs() < 1e-6, "C {fit:?}");
        assert!((fit.el - cell.el).abs() < 1e-8, "El {fit:?}");
    }

    #[test]
    fn recovers_simulated_parameters_per_sweep() {
        let cells = [
            RcCircuit::new(2e8, 1e-10, -0.07),
            RcCircuit::new(1.5e8, 8e-11, -0.065),
            RcCircuit::new(3e8, 1.2e-10, -0.072),
        ];
        let (voltages, currents): (Vec<_>, Vec<_>) =
            cells.iter().enumerate().map(|(k, &cell)| sweep(cell, k as u64)).unzip();

        let sink = CollectingSink::new();
        let ctx = FitContext {
            spikes: &DvDtSpikeDetector::default(),
            stimulus: &DiffStimulusExtractor,
            sink: &sink,
        };
        let fits = fit_rcel(&voltages, &currents, DT, false, ctx).unwrap();

        assert_eq!(fits.len(), 3);
        for (k, &cell) in cells.iter().enumerate() {
            assert_recovers(fits.get(k).unwrap(), cell);
        }
        assert!(sink.is_empty(), "{:?}", sink.messages());
    }

    #[test]
    fn spikes_warn_but_do_not_stop_the_fit() {
        let cell = RcCircuit::new(2e8, 1e-10, -0.07);
        let (mut voltage, current) = sweep(cell, 11);
        // One 20 mV upstroke near the end of the sweep.
        let n = voltage.len();
        voltage[n - 2] = voltage[n - 3] + 0.02;

        let sink = CollectingSink::new();
        let ctx = FitContext {
            spikes: &DvDtSpikeDetector::default(),
            stimulus: &DiffStimulusExtractor,
            sink: &sink,
        };
        let fits = fit_rcel(&[voltage], &[current], DT, false, ctx).unwrap();

        assert_eq!(fits.len(), 1);
        let messages = sink.messages();
        assert!(messages.iter().any(|m| m.contains("spike in subthreshold noise")));
    }

    #[test]
    fn no_rest_crops_to_extractor_window() {
        let cell = RcCircuit::new(2e8, 1e-10, -0.07);
        let (mut voltage, current) = sweep(cell, 3);
        // Corrupt samples outside 500..1500 so any leakage would bias the fit.
        for v in voltage.iter_mut().take(500) {
            *v = 0.0;
        }
        for v in voltage.iter_mut().skip(1500) {
            *v = 1.0;
        }

        let sink = CollectingSink::new();
        let ctx = FitContext {
            spikes: &DvDtSpikeDetector::default(),
            stimulus: &FixedWindow(500, 1500),
            sink: &sink,
        };
        let fits = fit_rcel(&[voltage.clone()], &[current.clone()], DT, true, ctx).unwrap();
        let cropped = fit_rcel(&[voltage[500..1500].to_vec()], &[current[500..1500].to_vec()], DT, false, ctx).unwrap();

        assert_eq!(fits, cropped);
        assert_recovers(fits.get(0).unwrap(), cell);
    }

    #[test]
    fn no_rest_without_stimulus_is_an_error() {
        let voltage = vec![-0.07; 100];
        let current = vec![0.0; 100];
        let sink = CollectingSink::new();
        let ctx = FitContext {
            spikes: &DvDtSpikeDetector::default(),
            stimulus: &DiffStimulusExtractor,
            sink: &sink,
        };
        let err = fit_rcel(&[vec![-0.07; 10], voltage], &[vec![1.0; 10], current], DT, true, ctx).unwrap_err();
        assert!(matches!(err, FitError::NoStimulus { sweep: 0, .. }));
    }

    #[test]
    fn zero_current_is_singular() {
        let voltage: Vec<f64> = (0..20).map(|k| -0.07 + 1e-4 * (k as f64 * 0.3).sin()).collect();
        let sink = CollectingSink::new();
        let ctx = FitContext {
            spikes: &DvDtSpikeDetector::default(),
            stimulus: &DiffStimulusExtractor,
            sink: &sink,
        };
        let err = fit_rcel(&[voltage], &[vec![0.0; 20]], DT, false, ctx).unwrap_err();
        assert!(matches!(err, FitError::Singular { sweep: 0, cols: 3, .. }));
    }

    #[test]
    fn mismatched_sweep_is_reported_with_its_index() {
        let sink = CollectingSink::new();
        let ctx = FitContext {
            spikes: &DvDtSpikeDetector::default(),
            stimulus: &DiffStimulusExtractor,
            sink: &sink,
        };
        let (v, i) = sweep(RcCircuit::new(2e8, 1e-10, -0.07), 1);
        let err = fit_rcel(&[v.clone(), v], &[i.clone(), i[..10].to_vec()], DT, false, ctx).unwrap_err();
        assert_eq!(
            err,
            FitError::LengthMismatch {
                sweep: 1,
                voltage: 2000,
                current: 10
            }
        );
    }

    #[test]
    fn inversion_matches_euler_coefficients() {
        let (r, c, el, dt) = (1e8, 1e-10, -0.07, 1e-4);
        let tau = r * c;
        let fit = invert_one_step(1.0 - dt / tau, dt / c, dt * el / tau, dt);
        assert!((fit.resistance / r - 1.0).abs() < 1e-12);
        assert!((fit.capacitance / c - 1.0).abs() < 1e-12);
        assert!((fit.el - el).abs() < 1e-12);
    }
}
