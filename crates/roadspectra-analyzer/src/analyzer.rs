//! The analysis pipeline.
//!
//! One [`SpectralAnalyzer::analyze`] call runs the stages strictly in
//! sequence (size gate, indexing, operator construction, eigen
//! estimation, singular decomposition, critical-edge ranking, norm
//! estimation, assembly), each consuming the previous stage's output. The
//! network is borrowed read-only; all intermediate state is owned by the
//! call and dropped on return; only the [`SpectralMetrics`] record escapes.
//!
//! Independent analyses share no mutable state, so [`analyze_batch`] runs
//! them in parallel and isolates per-network failures.

use rayon::prelude::*;
use roadspectra_core::{
    AnalysisError, AnalysisResult, Eigenvalue, RoadNetwork, SpectralMetrics,
};

use crate::backend::{KrylovBackend, SpectralBackend};
use crate::index::NodeIndex;
use crate::operator::build_operator;
use crate::ranking::rank_critical_edge;
use crate::stability;
use crate::svd::SingularDecomposition;

/// Upper bound on the number of dominant eigenvalues computed.
pub const MAX_EIGENVALUES: usize = 50;

/// Upper bound on the number of singular triplets computed.
pub const MAX_SINGULAR_TRIPLETS: usize = 30;

/// Minimum node count for the norm stage.
pub const MIN_NODES_NORM: usize = 2;

/// Minimum node count for the eigen/SVD stages (`min(50, N - 2)` must be
/// at least 1).
pub const MIN_NODES_SPECTRAL: usize = 3;

/// Batch, single-shot spectral diagnostics over road-network snapshots.
#[derive(Debug, Clone, Default)]
pub struct SpectralAnalyzer<B = KrylovBackend> {
    backend: B,
}

impl SpectralAnalyzer<KrylovBackend> {
    /// Analyzer with the built-in Krylov backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: KrylovBackend::default(),
        }
    }
}

impl<B: SpectralBackend> SpectralAnalyzer<B> {
    /// Analyzer over a caller-supplied linear-algebra backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Run the full diagnostic pipeline over one network snapshot.
    pub fn analyze<N>(&self, network: &N) -> AnalysisResult<SpectralMetrics>
    where
        N: RoadNetwork + ?Sized,
    {
        let node_count = network.nodes().len();
        let edge_count = network.edges().len();

        if node_count < MIN_NODES_NORM {
            return Err(AnalysisError::graph_too_small(
                node_count,
                MIN_NODES_NORM,
                "norm estimation",
            ));
        }
        if node_count < MIN_NODES_SPECTRAL {
            return Err(AnalysisError::graph_too_small(
                node_count,
                MIN_NODES_SPECTRAL,
                "eigen estimation",
            ));
        }

        let index = NodeIndex::build(network.nodes());
        let (operator, contributing) = build_operator(network, &index);
        tracing::debug!(
            node_count,
            edge_count,
            contributing,
            nnz = operator.nnz(),
            "adjacency operator built"
        );

        let k_eigen = MAX_EIGENVALUES.min(node_count - 2);
        let eigenvalues = self.backend.dominant_eigenvalues(&operator, k_eigen)?;
        let spectral_radius = eigenvalues
            .iter()
            .map(|c| c.norm())
            .fold(0.0, f64::max);

        let k_svd = MAX_SINGULAR_TRIPLETS.min(node_count - 2);
        let triplets = self.backend.truncated_svd(&operator, k_svd)?;
        let decomposition = SingularDecomposition::from_ascending(triplets);

        let critical_street =
            rank_critical_edge(network, &index, decomposition.u1(), decomposition.v1());

        let indicators = stability::estimate(&operator, decomposition.sigma_max());

        tracing::info!(
            node_count,
            edge_count,
            spectral_radius,
            h_inf_norm = indicators.h_inf_norm,
            kreiss_constant = indicators.kreiss_constant,
            critical_street = ?critical_street.as_ref().map(|c| c.id.as_str()),
            "spectral analysis complete"
        );

        Ok(assemble_metrics(
            node_count,
            edge_count,
            eigenvalues,
            spectral_radius,
            decomposition,
            indicators,
            critical_street,
        ))
    }
}

/// Pure aggregation of the stage outputs into the immutable result record.
fn assemble_metrics(
    node_count: usize,
    edge_count: usize,
    eigenvalues: Vec<num_complex::Complex64>,
    spectral_radius: f64,
    decomposition: SingularDecomposition,
    indicators: stability::StabilityIndicators,
    critical_street: Option<roadspectra_core::CriticalStreet>,
) -> SpectralMetrics {
    SpectralMetrics {
        node_count,
        edge_count,
        avg_degree: edge_count as f64 / node_count as f64,
        spectral_radius,
        eigenvalues: eigenvalues
            .into_iter()
            .map(|c| Eigenvalue::new(c.re, c.im))
            .collect(),
        singular_values: decomposition.singular_values.clone(),
        u1: decomposition.u1().to_vec(),
        v1: decomposition.v1().to_vec(),
        h2_norm: indicators.h2_norm,
        h_inf_norm: indicators.h_inf_norm,
        kreiss_constant: indicators.kreiss_constant,
        critical_street,
    }
}

/// Analyze many independent networks in parallel.
///
/// Each entry produces its own result; one network's failure never aborts
/// the rest (skip-and-continue). Result order matches input order.
pub fn analyze_batch<B, N>(
    analyzer: &SpectralAnalyzer<B>,
    networks: &[(String, N)],
) -> Vec<(String, AnalysisResult<SpectralMetrics>)>
where
    B: SpectralBackend + Sync,
    N: RoadNetwork + Sync,
{
    networks
        .par_iter()
        .map(|(name, network)| {
            let result = analyzer.analyze(network);
            if let Err(err) = &result {
                tracing::warn!(network = %name, error = %err, "analysis failed; continuing batch");
            }
            (name.clone(), result)
        })
        .collect()
}
