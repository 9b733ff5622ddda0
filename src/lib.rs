//! `passive-rc` library crate.
//!
//! Estimates the passive membrane resistance R, capacitance C and resting
//! potential El of a neuron from current-clamp sweeps by fitting a
//! single-compartment RC circuit with linear least squares.
//!
//! - [`fit`]: the three fits plus smoothing and summaries
//! - [`collab`]: spike detection, stimulus extraction and warning sinks
//! - [`sim`]: synthetic sweeps from a known circuit

pub mod collab;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod sim;

pub use domain::{FitConfig, REl, RElFits, RcEl, RcElFits, Smoothed, SmoothedFit, SmoothedReturn};
pub use error::FitError;
pub use fit::{PassiveFitter, PassiveSummary};
