//! Krylov-subspace primitives shared by the iterative solvers.
//!
//! Start vectors come from a seeded linear congruential generator so that
//! repeated analyses of an unchanged network are bit-identical; there is no
//! wall-clock or thread-order dependence anywhere in the solvers.

/// Numerical zero threshold.
pub const EPS: f64 = 1e-12;

/// Default residual / stabilization tolerance for iterative solvers.
pub const CONVERGENCE_TOL: f64 = 1e-10;

/// Default iteration cap for power iteration.
pub const MAX_ITER: usize = 1000;

/// Normalize a vector to unit length in place, returning its prior norm.
pub fn normalize(v: &mut [f64]) -> f64 {
    let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > EPS {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    norm
}

/// Dot product.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// `a -= scale * b`
pub fn axpy(a: &mut [f64], b: &[f64], scale: f64) {
    for (ai, &bi) in a.iter_mut().zip(b.iter()) {
        *ai -= scale * bi;
    }
}

/// Deterministic pseudo-random unit vector from a seeded LCG.
pub fn seeded_unit_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut v = Vec::with_capacity(n);
    let mut state = seed;

    for _ in 0..n {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let rand = ((state >> 33) as f64) / (u32::MAX as f64) - 0.5;
        v.push(rand);
    }

    normalize(&mut v);
    v
}

/// Build an orthonormal basis of the Krylov subspace generated by
/// `matvec` from a seeded start vector.
///
/// Full Gram-Schmidt reorthogonalization (applied twice per vector) keeps
/// the basis orthonormal for the Rayleigh-Ritz projection downstream. On
/// breakdown (the next Krylov vector lies in the span of the basis) the
/// direction is replaced by a fresh seeded random vector orthogonalized
/// against the basis, so the subspace keeps growing until `dim` vectors
/// exist or the full space is exhausted.
pub fn orthonormal_krylov_basis<F>(matvec: F, n: usize, dim: usize, seed: u64) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let dim = dim.min(n);
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(dim);
    if dim == 0 {
        return basis;
    }

    basis.push(seeded_unit_vector(n, seed));

    let mut replacement_seed = seed;
    while basis.len() < dim {
        let mut w = matvec(&basis[basis.len() - 1]);

        if orthogonalize(&mut w, &basis) <= CONVERGENCE_TOL {
            // Invariant subspace reached; continue in a fresh direction
            let mut found = false;
            for _ in 0..8 {
                replacement_seed = replacement_seed.wrapping_add(0x9e37_79b9);
                w = seeded_unit_vector(n, replacement_seed);
                if orthogonalize(&mut w, &basis) > CONVERGENCE_TOL {
                    found = true;
                    break;
                }
            }
            if !found {
                break;
            }
        }

        basis.push(w);
    }

    basis
}

/// Orthogonalize `w` against every basis vector (two Gram-Schmidt sweeps)
/// and normalize it, returning its residual norm before normalization.
fn orthogonalize(w: &mut [f64], basis: &[Vec<f64>]) -> f64 {
    for _ in 0..2 {
        for b in basis {
            let proj = dot(w, b);
            axpy(w, b, proj);
        }
    }
    normalize(w)
}

/// Power iteration for the largest-magnitude eigenvalue of a symmetric
/// positive semi-definite operator.
///
/// The stability estimator feeds it `C²` (symmetric PSD even when `C` has
/// mixed-sign spectrum), so the Rayleigh quotient converges to the squared
/// spectral norm.
#[derive(Debug, Clone)]
pub struct PowerIteration {
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance on the Rayleigh quotient
    pub tol: f64,
}

impl Default for PowerIteration {
    fn default() -> Self {
        Self {
            max_iter: MAX_ITER,
            tol: CONVERGENCE_TOL,
        }
    }
}

impl PowerIteration {
    /// Largest eigenvalue of a symmetric PSD operator given as a closure.
    /// Returns 0.0 for the zero operator.
    pub fn largest_eigenvalue<F>(&self, n: usize, matvec: F) -> f64
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        if n == 0 {
            return 0.0;
        }

        let mut v = seeded_unit_vector(n, 42);
        let mut lambda = 0.0;

        for _ in 0..self.max_iter {
            let mut w = matvec(&v);
            let new_lambda = dot(&v, &w);

            if normalize(&mut w) <= EPS {
                // Operator annihilated the iterate
                return new_lambda.max(0.0);
            }

            if (new_lambda - lambda).abs() < self.tol * new_lambda.abs().max(1.0) {
                return new_lambda.max(0.0);
            }

            lambda = new_lambda;
            v = w;
        }

        lambda.max(0.0)
    }
}
