use thiserror::Error;

/// Errors produced while smoothing or fitting sweeps.
///
/// Variants that concern a single sweep carry its index within the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("sweep {sweep}: least-squares design is rank deficient (rank {rank} of {cols})")]
    Singular { sweep: usize, rank: usize, cols: usize },

    #[error("sweep {sweep}: least-squares solve failed: {reason}")]
    SolveFailed { sweep: usize, reason: String },

    #[error("sweep {sweep}: voltage has {voltage} samples but current has {current}")]
    LengthMismatch {
        sweep: usize,
        voltage: usize,
        current: usize,
    },

    #[error("batch has {voltages} voltage traces but {currents} current traces")]
    BatchMismatch { voltages: usize, currents: usize },

    #[error("invalid filter width: {0}")]
    FilterWidth(String),

    #[error("time step must be finite and > 0, got {0}")]
    InvalidTimeStep(f64),

    #[error("capacitance must be finite and > 0, got {0}")]
    InvalidCapacitance(f64),

    #[error("sweep {sweep}: {have} samples, need at least {need}")]
    SweepTooShort { sweep: usize, have: usize, need: usize },

    #[error("sweep {sweep}: {reason}")]
    NoStimulus { sweep: usize, reason: String },

    #[error("no sweeps to fit")]
    EmptyBatch,

    #[error("configuration error: {0}")]
    Config(String),
}

impl FitError {
    /// Re-tag a per-sweep error with the sweep index it occurred in.
    ///
    /// Helpers below the batch level do not know which sweep they run on and
    /// report index 0.
    pub(crate) fn at_sweep(self, idx: usize) -> Self {
        match self {
            FitError::Singular { rank, cols, .. } => FitError::Singular { sweep: idx, rank, cols },
            FitError::SolveFailed { reason, .. } => FitError::SolveFailed { sweep: idx, reason },
            FitError::LengthMismatch { voltage, current, .. } => FitError::LengthMismatch {
                sweep: idx,
                voltage,
                current,
            },
            FitError::SweepTooShort { have, need, .. } => FitError::SweepTooShort { sweep: idx, have, need },
            FitError::NoStimulus { reason, .. } => FitError::NoStimulus { sweep: idx, reason },
            other => other,
        }
    }
}
