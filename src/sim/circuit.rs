//! Forward-Euler integration of the single-compartment RC membrane.

use serde::{Deserialize, Serialize};

use crate::domain::RcEl;

/// Passive membrane `dV/dt = (-(V - El) + R·I) / (R·C)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RcCircuit {
    /// Ω
    pub r: f64,
    /// F
    pub c: f64,
    /// V
    pub el: f64,
}

impl RcCircuit {
    pub fn new(r: f64, c: f64, el: f64) -> Self {
        Self { r, c, el }
    }

    pub fn params(&self) -> RcEl {
        RcEl {
            resistance: self.r,
            capacitance: self.c,
            el: self.el,
        }
    }

    /// `dV/dt` at voltage `v` under injected current `i`.
    pub fn dvdt(&self, v: f64, i: f64) -> f64 {
        (-(v - self.el) + self.r * i) / (self.r * self.c)
    }

    /// Voltage response to `current`, starting at `v0`.
    ///
    /// `v[k+1] = v[k] + dt · dV/dt(v[k], i[k])`. The output has one sample per
    /// current sample; the last current sample does not influence it.
    pub fn simulate(&self, current: &[f64], dt: f64, v0: f64) -> Vec<f64> {
        let mut voltage = Vec::with_capacity(current.len());
        let mut v = v0;
        for &i in current {
            voltage.push(v);
            v += dt * self.dvdt(v, i);
        }
        voltage
    }
}
