//! Passive parameter fitting.
//!
//! Responsibilities:
//!
//! - smooth a sweep and its dV/dt with a box filter
//! - fit R, C, El by least squares (smoothed dV/dt, or one-step-ahead voltage)
//! - fit R, El with a known capacitance
//! - summarize fits across sweeps
//!
//! Sweeps are fitted independently (in parallel) and returned in input order.

pub mod batch;
pub mod fitter;
pub mod rcel;
pub mod rel;
pub mod smoothed;
pub mod smoothing;
pub mod summary;

pub use batch::FitContext;
pub use fitter::*;
pub use rcel::*;
pub use rel::*;
pub use smoothed::*;
pub use smoothing::*;
pub use summary::*;
