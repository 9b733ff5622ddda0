//! Spike detection on single sweeps.

/// Finds action potentials in a voltage trace.
pub trait SpikeDetector: Send + Sync {
    /// Sample indices of spikes in one sweep sampled at `dt`.
    fn find_spikes(&self, voltage: &[f64], dt: f64) -> Vec<usize>;

    /// Spike indices for each sweep of a batch, in sweep order.
    fn find_spikes_list(&self, voltages: &[Vec<f64>], dt: f64) -> Vec<Vec<usize>> {
        voltages.iter().map(|v| self.find_spikes(v, dt)).collect()
    }
}

/// Reports upward crossings of a dV/dt threshold.
///
/// The forward difference `(v[k+1] - v[k]) / dt` is compared against
/// `dvdt_threshold` (V/s); a spike is reported at `k` when the derivative rises
/// through the threshold and at least `min_interval_s` has passed since the
/// previous spike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DvDtSpikeDetector {
    pub dvdt_threshold: f64,
    pub min_interval_s: f64,
}

impl Default for DvDtSpikeDetector {
    fn default() -> Self {
        Self {
            dvdt_threshold: 20.0,
            min_interval_s: 2e-3,
        }
    }
}

impl SpikeDetector for DvDtSpikeDetector {
    fn find_spikes(&self, voltage: &[f64], dt: f64) -> Vec<usize> {
        if !(dt.is_finite() && dt > 0.0) {
            return Vec::new();
        }
        let min_gap = (self.min_interval_s / dt).round().max(0.0) as usize;

        let mut spikes = Vec::new();
        let mut last: Option<usize> = None;
        let mut above = false;
        for (k, pair) in voltage.windows(2).enumerate() {
            let dvdt = (pair[1] - pair[0]) / dt;
            let is_above = dvdt >= self.dvdt_threshold;
            if is_above && !above && last.is_none_or(|prev| k - prev >= min_gap) {
                spikes.push(k);
                last = Some(k);
            }
            above = is_above;
        }
        spikes
    }
}
