//! The immutable result record of one spectral analysis.

use serde::{Deserialize, Serialize};

use crate::network::GeoPoint;

/// One complex eigenvalue of the adjacency operator.
///
/// Serialized as `{"real": .., "imag": ..}` to stay compatible with the
/// metadata dumps consumed by downstream feature tooling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Eigenvalue {
    /// Real part
    pub real: f64,
    /// Imaginary part
    pub imag: f64,
}

impl Eigenvalue {
    /// Create an eigenvalue from its parts.
    pub fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    /// Magnitude (modulus) of the eigenvalue.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.real.hypot(self.imag)
    }
}

/// The dominant structural bottleneck of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalStreet {
    /// External identifier of the winning edge
    pub id: String,
    /// Display name (edge name, or id when unnamed)
    pub name: String,
    /// Spectral importance `|u1[src] * v1[dst]|`
    pub importance: f64,
    /// Edge geometry converted to geographic coordinates
    pub polyline: Vec<GeoPoint>,
}

/// Immutable spectral diagnostics for one road network snapshot.
///
/// Assembled once per analysis and never mutated afterwards; safe to
/// serialize, persist, and share across threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralMetrics {
    /// Number of junctions in the network
    pub node_count: usize,
    /// Number of directed edges in the network (including edges that did
    /// not contribute to the operator)
    pub edge_count: usize,
    /// `edge_count / node_count`
    pub avg_degree: f64,
    /// Largest eigenvalue magnitude in the truncated spectrum
    pub spectral_radius: f64,
    /// Truncated dominant spectrum, up to `min(50, N - 2)` values
    pub eigenvalues: Vec<Eigenvalue>,
    /// Leading singular values, descending, up to `min(30, N - 2)` values
    pub singular_values: Vec<f64>,
    /// Dominant left singular vector (length `node_count`)
    pub u1: Vec<f64>,
    /// Dominant right singular vector (length `node_count`)
    pub v1: Vec<f64>,
    /// H2 norm proxy: Frobenius norm of the operator
    pub h2_norm: f64,
    /// H-infinity norm proxy: top singular value
    pub h_inf_norm: f64,
    /// Approximate Kreiss constant (bounded-sample commutator surrogate,
    /// intentionally coarse; see the stability estimator)
    pub kreiss_constant: f64,
    /// The dominant bottleneck edge, absent when no edge has both
    /// endpoints resolvable
    pub critical_street: Option<CriticalStreet>,
}
