//! Synthetic sweeps from a known RC circuit.
//!
//! Used to check that the fits recover the parameters a sweep was generated
//! with, and by callers who want to validate a pipeline end to end.

pub mod circuit;
pub mod current;

pub use circuit::*;
pub use current::*;
