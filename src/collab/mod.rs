//! Collaborators the fits consume but do not own.
//!
//! Each concern is a trait so a pipeline can plug in its own spike detector,
//! stimulus extractor or warning destination. The crate ships one default
//! implementation of each:
//!
//! - [`DvDtSpikeDetector`]: upward dV/dt threshold crossings
//! - [`DiffStimulusExtractor`]: stimulus edges from changes in the injected current
//! - [`TracingSink`]: forwards warnings to `tracing`
//!
//! All collaborators are `Send + Sync` because sweeps are fitted in parallel.

pub mod sink;
pub mod spikes;
pub mod stimulus;

pub use sink::*;
pub use spikes::*;
pub use stimulus::*;
