//! Linear-algebra backend seam.
//!
//! The eigen and SVD computations sit behind [`SpectralBackend`] so the
//! concrete solver (the built-in Krylov projection, or a native library
//! binding) can be swapped without touching the ranking or norm logic.
//!
//! [`KrylovBackend`] is the default implementation: it projects the sparse
//! operator onto a deterministic Krylov subspace (Rayleigh-Ritz) and
//! solves the small projected problem densely with `nalgebra`. The
//! subspace is grown geometrically until the leading Ritz values
//! stabilize; exhausting the growth budget without stabilizing is a
//! reported [`SolverNonconvergence`], never a silent fallback.
//!
//! [`SolverNonconvergence`]: roadspectra_core::AnalysisError::SolverNonconvergence

use nalgebra::{DMatrix, SymmetricEigen};
use num_complex::Complex64;
use roadspectra_core::{AnalysisError, AnalysisResult};

use crate::krylov::{dot, normalize, orthonormal_krylov_basis, EPS};
use crate::operator::CsrMatrix;
use crate::svd::SvdTriplets;

/// Seed for the eigen-stage Krylov start vector.
const EIGEN_SEED: u64 = 42;
/// Seed for the SVD-stage Krylov start vector.
const SVD_SEED: u64 = 1337;

/// Strategy interface over the sparse linear-algebra solvers.
pub trait SpectralBackend {
    /// Up to `k` eigenvalues of `operator`, selected by largest magnitude,
    /// returned in descending magnitude order. `k` must not exceed the
    /// operator dimension.
    fn dominant_eigenvalues(
        &self,
        operator: &CsrMatrix,
        k: usize,
    ) -> AnalysisResult<Vec<Complex64>>;

    /// Up to `k` leading singular triplets of `operator`, returned in
    /// ascending singular-value order (iterative-solver convention; the
    /// decomposition stage re-sorts).
    fn truncated_svd(&self, operator: &CsrMatrix, k: usize) -> AnalysisResult<SvdTriplets>;
}

/// Deterministic Krylov/Rayleigh-Ritz solver.
#[derive(Debug, Clone)]
pub struct KrylovBackend {
    /// How many times the subspace may be grown before giving up
    pub max_growth_steps: usize,
    /// Relative stabilization tolerance on the leading Ritz values
    pub tol: f64,
    /// Extra subspace dimensions beyond `2k`
    pub subspace_padding: usize,
}

impl Default for KrylovBackend {
    fn default() -> Self {
        Self {
            max_growth_steps: 4,
            tol: 1e-8,
            subspace_padding: 10,
        }
    }
}

impl KrylovBackend {
    /// Create a backend with an explicit growth budget and tolerance.
    pub fn new(max_growth_steps: usize, tol: f64) -> Self {
        Self {
            max_growth_steps,
            tol,
            ..Default::default()
        }
    }

    fn initial_dim(&self, n: usize, k: usize) -> usize {
        (2 * k + self.subspace_padding).min(n)
    }

    /// Max relative change between two descending value sequences.
    fn relative_drift(a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs() / x.abs().max(1.0))
            .fold(0.0, f64::max)
    }
}

/// Projected matrix `H = Vᵀ A V` for an orthonormal basis `V`.
fn projected_matrix<F>(matvec: F, basis: &[Vec<f64>]) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let m = basis.len();
    let images: Vec<Vec<f64>> = basis.iter().map(|v| matvec(v)).collect();
    DMatrix::from_fn(m, m, |i, j| dot(&basis[i], &images[j]))
}

/// Ritz values of the operator over `basis`, descending by magnitude with
/// a deterministic total tie order.
fn ritz_values<F>(matvec: F, basis: &[Vec<f64>]) -> Vec<Complex64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let h = projected_matrix(matvec, basis);
    let mut values: Vec<Complex64> = h
        .complex_eigenvalues()
        .iter()
        .map(|c| Complex64::new(c.re, c.im))
        .collect();
    values.sort_by(|a, b| {
        (b.norm(), b.re, b.im)
            .partial_cmp(&(a.norm(), a.re, a.im))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    values
}

impl SpectralBackend for KrylovBackend {
    fn dominant_eigenvalues(
        &self,
        operator: &CsrMatrix,
        k: usize,
    ) -> AnalysisResult<Vec<Complex64>> {
        let n = operator.rows;
        let k = k.min(n);
        if k == 0 {
            return Ok(Vec::new());
        }

        let matvec = |x: &[f64]| operator.matvec(x);
        let mut dim = self.initial_dim(n, k);
        let mut previous: Option<Vec<f64>> = None;
        let mut spent = 0usize;

        for _ in 0..=self.max_growth_steps {
            let basis = orthonormal_krylov_basis(matvec, n, dim, EIGEN_SEED);
            spent += basis.len();

            let mut values = ritz_values(matvec, &basis);
            values.truncate(k);
            values.resize(k, Complex64::new(0.0, 0.0));

            // A basis spanning the whole space makes the projection exact
            if basis.len() == n {
                return Ok(values);
            }

            let magnitudes: Vec<f64> = values.iter().map(|c| c.norm()).collect();
            if let Some(prev) = &previous {
                if Self::relative_drift(&magnitudes, prev) < self.tol {
                    return Ok(values);
                }
            }
            previous = Some(magnitudes);
            dim = (dim * 2).min(n);
        }

        Err(AnalysisError::nonconvergence("eigen", spent))
    }

    fn truncated_svd(&self, operator: &CsrMatrix, k: usize) -> AnalysisResult<SvdTriplets> {
        let n = operator.rows;
        let k = k.min(n);
        if k == 0 {
            return Ok(SvdTriplets {
                singular_values: Vec::new(),
                left: Vec::new(),
                right: Vec::new(),
            });
        }

        // Gram operator AᵀA: symmetric PSD, eigenvalues are σ².
        let gram = |x: &[f64]| operator.matvec_transpose(&operator.matvec(x));
        let mut dim = self.initial_dim(n, k);
        let mut previous: Option<Vec<f64>> = None;
        let mut spent = 0usize;

        for _ in 0..=self.max_growth_steps {
            let basis = orthonormal_krylov_basis(gram, n, dim, SVD_SEED);
            spent += basis.len();

            let triplets = gram_triplets(operator, &basis, k);
            let exact = basis.len() == n;

            if exact {
                return Ok(triplets);
            }

            let mut leading = triplets.singular_values.clone();
            leading.reverse(); // compare in descending order
            if let Some(prev) = &previous {
                if Self::relative_drift(&leading, prev) < self.tol {
                    return Ok(triplets);
                }
            }
            previous = Some(leading);
            dim = (dim * 2).min(n);
        }

        Err(AnalysisError::nonconvergence("svd", spent))
    }
}

/// Rayleigh-Ritz extraction of the top `k` singular triplets from a basis
/// of the Gram operator's Krylov subspace, returned ascending.
fn gram_triplets(operator: &CsrMatrix, basis: &[Vec<f64>], k: usize) -> SvdTriplets {
    let n = operator.rows;
    let m = basis.len();
    let gram = |x: &[f64]| operator.matvec_transpose(&operator.matvec(x));

    let s = projected_matrix(gram, basis);
    // Symmetrize to wash out Gram-Schmidt roundoff
    let s = (&s + s.transpose()) * 0.5;
    let eigen = SymmetricEigen::new(s);

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Keep the k largest, in ascending order
    let chosen = &order[m.saturating_sub(k)..];

    let mut singular_values = Vec::with_capacity(chosen.len());
    let mut left = Vec::with_capacity(chosen.len());
    let mut right = Vec::with_capacity(chosen.len());

    for &idx in chosen {
        let lambda = eigen.eigenvalues[idx].max(0.0);
        let sigma = lambda.sqrt();

        // Right vector: lift the projected eigenvector back to R^n
        let coeffs = eigen.eigenvectors.column(idx);
        let mut v = vec![0.0; n];
        for (j, basis_vec) in basis.iter().enumerate() {
            let c = coeffs[j];
            for (vi, &bi) in v.iter_mut().zip(basis_vec.iter()) {
                *vi += c * bi;
            }
        }
        normalize(&mut v);

        // Left vector: u = A v / σ
        let u = if sigma > EPS {
            let mut u = operator.matvec(&v);
            for x in u.iter_mut() {
                *x /= sigma;
            }
            normalize(&mut u);
            u
        } else {
            vec![0.0; n]
        };

        singular_values.push(sigma);
        left.push(u);
        right.push(v);
    }

    // Honor the requested count even over a deficient subspace
    while singular_values.len() < k {
        singular_values.insert(0, 0.0);
        left.insert(0, vec![0.0; n]);
        right.insert(0, vec![0.0; n]);
    }

    SvdTriplets {
        singular_values,
        left,
        right,
    }
}
