//! Norm-based stability indicators.
//!
//! Three scalar fragility measures are derived from the operator:
//!
//! - **H2 proxy**: Frobenius norm of the stored entries (√nnz for a
//!   unit-weighted adjacency operator), aggregate perturbation energy.
//! - **H∞ proxy**: the top singular value, worst-case single-direction
//!   amplification.
//! - **Kreiss constant**: a non-normality surrogate. This is an
//!   *intentionally approximate* estimate: instead of a resolvent-based
//!   Kreiss computation, it takes a bounded leading principal submatrix,
//!   forms the commutator `C = A·Aᵀ − Aᵀ·A`, and scales its spectral norm
//!   by the sample size. Downstream reports and feature tables are
//!   calibrated against this surrogate; do not replace it with an exact
//!   computation without recalibrating them.

use ndarray::{Array1, Array2};

use crate::krylov::PowerIteration;
use crate::operator::CsrMatrix;

/// Bound on the dense sample used for the commutator.
pub const KREISS_SAMPLE_SIZE: usize = 500;

/// Heuristic scale applied to the normalized commutator norm.
pub const KREISS_SCALE: f64 = 1000.0;

/// The three norm-based indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityIndicators {
    /// Frobenius norm of the operator
    pub h2_norm: f64,
    /// Top singular value
    pub h_inf_norm: f64,
    /// Approximate Kreiss constant
    pub kreiss_constant: f64,
}

/// Estimate all indicators for an operator whose top singular value is
/// already known from the singular decomposition.
#[must_use]
pub fn estimate(operator: &CsrMatrix, sigma_max: f64) -> StabilityIndicators {
    StabilityIndicators {
        h2_norm: operator.frobenius_norm(),
        h_inf_norm: sigma_max,
        kreiss_constant: kreiss_approximation(operator),
    }
}

/// Bounded-sample commutator surrogate for the Kreiss constant.
fn kreiss_approximation(operator: &CsrMatrix) -> f64 {
    let sample = KREISS_SAMPLE_SIZE.min(operator.rows);
    if sample == 0 {
        return 0.0;
    }

    let a = operator.principal_submatrix_dense(sample);
    let commutator = a.dot(&a.t()) - a.t().dot(&a);

    let norm = spectral_norm_symmetric(&commutator);
    (norm / sample as f64) * KREISS_SCALE
}

/// Spectral norm of a symmetric matrix via power iteration on its square.
///
/// The commutator is symmetric but typically has a mixed-sign spectrum
/// with paired magnitudes; squaring makes the operator PSD so the power
/// iteration converges to ‖C‖².
fn spectral_norm_symmetric(c: &Array2<f64>) -> f64 {
    let n = c.nrows();
    let power = PowerIteration::default();
    let lambda = power.largest_eigenvalue(n, |x| {
        let xv = Array1::from(x.to_vec());
        c.dot(&c.dot(&xv)).to_vec()
    });
    lambda.max(0.0).sqrt()
}
