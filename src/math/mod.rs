//! Mathematical utilities: least squares, box filtering and index windows.

pub mod filter;
pub mod ols;
pub mod window;

pub use filter::*;
pub use ols::*;
pub use window::*;
