//! Cross-sweep averages of fitted passive parameters.

use serde::{Deserialize, Serialize};

use crate::domain::{RElFits, RcElFits};

/// Mean passive parameters over a batch of sweeps.
///
/// `tau` is `mean(R) · mean(C)`, not the mean of per-sweep time constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassiveSummary {
    pub n_sweeps: usize,
    /// Ω
    pub resistance: f64,
    /// F
    pub capacitance: f64,
    /// V
    pub el: f64,
    /// s
    pub tau: f64,
}

impl PassiveSummary {
    /// `None` for an empty batch.
    pub fn from_fits(fits: &RcElFits) -> Option<Self> {
        let resistance = mean(&fits.resistance)?;
        let capacitance = mean(&fits.capacitance)?;
        let el = mean(&fits.el)?;
        Some(Self {
            n_sweeps: fits.len(),
            resistance,
            capacitance,
            el,
            tau: resistance * capacitance,
        })
    }

    /// Summary of a fixed-capacitance fit; `capacitance` is the value it was fitted with.
    pub fn from_rel_fits(fits: &RElFits, capacitance: f64) -> Option<Self> {
        let resistance = mean(&fits.resistance)?;
        let el = mean(&fits.el)?;
        Some(Self {
            n_sweeps: fits.len(),
            resistance,
            capacitance,
            el,
            tau: resistance * capacitance,
        })
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
