//! Ordinary least squares solver.
//!
//! Every fit in this crate reduces to a small regression problem of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with two or three columns and one row per sample of a sweep.
//!
//! Implementation choices:
//! - Columns are equilibrated (scaled to unit norm) before factorization. The
//!   design mixes volts (~1e-2), amperes (~1e-10) and a constant column, so
//!   an unscaled rank test would throw away the current column.
//! - SVD is used rather than QR because the design is tall and may be nearly
//!   collinear. (Nalgebra's `QR::solve` is intended for square systems and will
//!   panic for non-square matrices.)
//! - Rank uses the numpy `lstsq` cutoff `eps · max(m, n) · σ_max`. A rank
//!   deficient design is an error, never a silently regularized answer.

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;

/// Solve `min ‖X β - y‖²` and return `β`.
///
/// Errors with [`FitError::Singular`] when the equilibrated design has rank
/// below its column count, and [`FitError::SolveFailed`] on non-finite input
/// or output. The sweep index in the error is 0; batch callers re-tag it.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, FitError> {
    let (m, n) = x.shape();
    if y.len() != m {
        return Err(FitError::SolveFailed {
            sweep: 0,
            reason: format!("design has {m} rows but target has {}", y.len()),
        });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::SolveFailed {
            sweep: 0,
            reason: "non-finite value in design or target".to_string(),
        });
    }

    // Zero columns keep scale 1 so they stay zero and fail the rank test below.
    let scales: Vec<f64> = (0..n)
        .map(|j| {
            let norm = x.column(j).norm();
            if norm > 0.0 { norm } else { 1.0 }
        })
        .collect();
    let xs = DMatrix::from_fn(m, n, |i, j| x[(i, j)] / scales[j]);

    let svd = xs.svd(true, true);
    let sigma_max = svd.singular_values.iter().fold(0.0_f64, |acc, &s| acc.max(s));
    let tol = f64::EPSILON * m.max(n) as f64 * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    if rank < n {
        return Err(FitError::Singular { sweep: 0, rank, cols: n });
    }

    let beta_scaled = svd.solve(y, tol).map_err(|reason| FitError::SolveFailed {
        sweep: 0,
        reason: reason.to_string(),
    })?;
    let beta = DVector::from_fn(n, |j, _| beta_scaled[j] / scales[j]);

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(FitError::SolveFailed {
            sweep: 0,
            reason: "solution is not finite".to_string(),
        })
    }
}

/// Build a design matrix from equal-length columns.
pub fn design_matrix(columns: &[&[f64]]) -> DMatrix<f64> {
    let rows = columns.first().map_or(0, |c| c.len());
    DMatrix::from_fn(rows, columns.len(), |i, j| columns[j][i])
}
