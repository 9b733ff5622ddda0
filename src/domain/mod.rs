//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - per-sweep fit outputs (`RcEl`, `REl`) and their batch forms (`RcElFits`, `RElFits`)
//! - smoothed series (`Smoothed`)
//! - configuration (`FitConfig`, `SmoothedReturn`)

pub mod types;

pub use types::*;
