//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON alongside other per-cell features
//! - reloaded later for comparisons

use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// Passive parameters of one sweep, in SI units (Ω, F, V).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RcEl {
    pub resistance: f64,
    pub capacitance: f64,
    pub el: f64,
}

impl RcEl {
    /// Membrane time constant `R·C` in seconds.
    pub fn tau(&self) -> f64 {
        self.resistance * self.capacitance
    }

    pub fn is_finite(&self) -> bool {
        self.resistance.is_finite() && self.capacitance.is_finite() && self.el.is_finite()
    }
}

/// Resistance and resting potential of one sweep with capacitance held fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct REl {
    pub resistance: f64,
    pub el: f64,
}

/// Per-sweep `(R, C, El)` as three parallel sequences in sweep order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RcElFits {
    pub resistance: Vec<f64>,
    pub capacitance: Vec<f64>,
    pub el: Vec<f64>,
}

impl RcElFits {
    pub fn len(&self) -> usize {
        self.resistance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resistance.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<RcEl> {
        Some(RcEl {
            resistance: *self.resistance.get(idx)?,
            capacitance: *self.capacitance.get(idx)?,
            el: *self.el.get(idx)?,
        })
    }

    pub fn last(&self) -> Option<RcEl> {
        self.len().checked_sub(1).and_then(|idx| self.get(idx))
    }

    pub fn push(&mut self, fit: RcEl) {
        self.resistance.push(fit.resistance);
        self.capacitance.push(fit.capacitance);
        self.el.push(fit.el);
    }
}

impl FromIterator<RcEl> for RcElFits {
    fn from_iter<I: IntoIterator<Item = RcEl>>(iter: I) -> Self {
        let mut out = RcElFits::default();
        for fit in iter {
            out.push(fit);
        }
        out
    }
}

/// Per-sweep `(R, El)` as two parallel sequences in sweep order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RElFits {
    pub resistance: Vec<f64>,
    pub el: Vec<f64>,
}

impl RElFits {
    pub fn len(&self) -> usize {
        self.resistance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resistance.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<REl> {
        Some(REl {
            resistance: *self.resistance.get(idx)?,
            el: *self.el.get(idx)?,
        })
    }
}

impl FromIterator<REl> for RElFits {
    fn from_iter<I: IntoIterator<Item = REl>>(iter: I) -> Self {
        let mut out = RElFits::default();
        for fit in iter {
            out.resistance.push(fit.resistance);
            out.el.push(fit.el);
        }
        out
    }
}

/// What the smoothed fit hands back.
///
/// `LastSweep` keeps the long-standing behavior of returning only the final
/// sweep's parameters even though every sweep is fitted. `AllSweeps` returns
/// the full per-sweep sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothedReturn {
    #[default]
    LastSweep,
    AllSweeps,
}

/// Output of the smoothed fit, shaped by [`SmoothedReturn`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothedFit {
    Last(RcEl),
    All(RcElFits),
}

impl SmoothedFit {
    /// Parameters of the final sweep, whichever mode produced this.
    pub fn last(&self) -> Option<RcEl> {
        match self {
            SmoothedFit::Last(fit) => Some(*fit),
            SmoothedFit::All(fits) => fits.last(),
        }
    }
}

/// Smoothed series for one sweep, each one sample shorter than the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Smoothed {
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
    pub dvdt: Vec<f64>,
}

/// Fitting configuration.
///
/// Collaborator settings (`spike_*`) only affect the default spike detector
/// built by [`crate::fit::PassiveFitter::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Sample interval (s).
    pub dt: f64,
    /// Box filter duration (s) for the smoothed fit.
    pub filter_size_s: f64,
    /// Crop the unsmoothed fit to the stimulus window. Inert for the smoothed fit.
    pub no_rest: bool,
    pub smoothed_return: SmoothedReturn,
    /// Upward dV/dt crossing (V/s) that counts as a spike.
    pub spike_dvdt_threshold: f64,
    /// Minimum spacing between reported spikes (s).
    pub spike_min_interval_s: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            dt: 5e-5,
            filter_size_s: 1e-3,
            no_rest: false,
            smoothed_return: SmoothedReturn::LastSweep,
            spike_dvdt_threshold: 20.0,
            spike_min_interval_s: 2e-3,
        }
    }
}

impl FitConfig {
    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, FitError> {
        let config: FitConfig =
            serde_json::from_str(json).map_err(|e| FitError::Config(format!("invalid JSON config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FitError> {
        crate::math::check_dt(self.dt)?;
        crate::math::filter_width(self.filter_size_s, self.dt)?;
        if !(self.spike_dvdt_threshold.is_finite() && self.spike_dvdt_threshold > 0.0) {
            return Err(FitError::Config(format!(
                "spike_dvdt_threshold must be finite and > 0, got {}",
                self.spike_dvdt_threshold
            )));
        }
        if !(self.spike_min_interval_s.is_finite() && self.spike_min_interval_s >= 0.0) {
            return Err(FitError::Config(format!(
                "spike_min_interval_s must be finite and >= 0, got {}",
                self.spike_min_interval_s
            )));
        }
        Ok(())
    }
}
