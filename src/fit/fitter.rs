//! Configured entry point bundling settings with collaborators.

use std::sync::Arc;

use crate::collab::{DiffStimulusExtractor, DvDtSpikeDetector, SpikeDetector, StimulusExtractor, TracingSink, WarningSink};
use crate::domain::{FitConfig, RElFits, RcElFits, Smoothed, SmoothedFit};
use crate::error::FitError;
use crate::fit::batch::FitContext;

/// Runs the passive fits with one [`FitConfig`] and one set of collaborators.
///
/// Defaults are [`DvDtSpikeDetector`] (tuned from the config),
/// [`DiffStimulusExtractor`] and [`TracingSink`]; each can be replaced.
#[derive(Clone)]
pub struct PassiveFitter {
    config: FitConfig,
    spikes: Arc<dyn SpikeDetector>,
    stimulus: Arc<dyn StimulusExtractor>,
    sink: Arc<dyn WarningSink>,
}

impl PassiveFitter {
    /// Validate `config` and attach the default collaborators.
    pub fn new(config: FitConfig) -> Result<Self, FitError> {
        config.validate()?;
        let spikes = DvDtSpikeDetector {
            dvdt_threshold: config.spike_dvdt_threshold,
            min_interval_s: config.spike_min_interval_s,
        };
        Ok(Self {
            config,
            spikes: Arc::new(spikes),
            stimulus: Arc::new(DiffStimulusExtractor),
            sink: Arc::new(TracingSink),
        })
    }

    pub fn with_spike_detector(mut self, spikes: Arc<dyn SpikeDetector>) -> Self {
        self.spikes = spikes;
        self
    }

    pub fn with_stimulus_extractor(mut self, stimulus: Arc<dyn StimulusExtractor>) -> Self {
        self.stimulus = stimulus;
        self
    }

    pub fn with_warning_sink(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    fn context(&self) -> FitContext<'_> {
        FitContext {
            spikes: self.spikes.as_ref(),
            stimulus: self.stimulus.as_ref(),
            sink: self.sink.as_ref(),
        }
    }

    /// Smooth one sweep with the configured filter.
    pub fn smooth(&self, voltage: &[f64], current: &[f64]) -> Result<Smoothed, FitError> {
        crate::fit::smooth(voltage, current, self.config.filter_size_s, self.config.dt)
    }

    /// Unsmoothed `(R, C, El)` per sweep.
    pub fn fit_rcel(&self, voltages: &[Vec<f64>], currents: &[Vec<f64>]) -> Result<RcElFits, FitError> {
        crate::fit::fit_rcel(voltages, currents, self.config.dt, self.config.no_rest, self.context())
    }

    /// Smoothed `(R, C, El)`, shaped by `config.smoothed_return`.
    pub fn fit_rcel_smoothed(&self, voltages: &[Vec<f64>], currents: &[Vec<f64>]) -> Result<SmoothedFit, FitError> {
        crate::fit::fit_rcel_smoothed(
            voltages,
            currents,
            self.config.dt,
            self.config.filter_size_s,
            self.config.no_rest,
            self.config.smoothed_return,
            self.sink.as_ref(),
        )
    }

    /// `(R, El)` per sweep with capacitance fixed at `capacitance` (F).
    pub fn fit_rel(&self, voltages: &[Vec<f64>], currents: &[Vec<f64>], capacitance: f64) -> Result<RElFits, FitError> {
        crate::fit::fit_rel(voltages, currents, capacitance, self.config.dt, self.sink.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::CollectingSink;

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = FitConfig {
            dt: -1.0,
            ..FitConfig::default()
        };
        assert!(matches!(PassiveFitter::new(config), Err(FitError::InvalidTimeStep(_))));
    }

    #[test]
    fn custom_sink_receives_warnings() {
        let sink = Arc::new(CollectingSink::new());
        let fitter = PassiveFitter::new(FitConfig {
            dt: 1e-4,
            ..FitConfig::default()
        })
        .unwrap()
        .with_warning_sink(sink.clone());

        let fits = fitter
            .fit_rel(&[vec![-0.07, -0.0699, -0.0698, -0.0697]], &[vec![0.0; 4]], 1e-10)
            .unwrap();
        assert_eq!(fits.len(), 1);
        // Either R is finite (no warning) or the non-finite value was reported.
        assert!((fits.resistance[0].is_finite() && fits.el[0].is_finite()) || !sink.is_empty());
    }
}
