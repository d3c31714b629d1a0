//! Error types for spectral road-network analysis.
//!
//! A single analysis either produces a complete [`SpectralMetrics`] record
//! or fails with one of the variants below; there are no partial results.
//! Dropped edges (unresolved endpoints) and a missing critical street are
//! *not* errors; they surface as filtering and an absent field.
//!
//! [`SpectralMetrics`]: crate::metrics::SpectralMetrics

use thiserror::Error;

/// A specialized `Result` type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failure modes of one spectral analysis run.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnalysisError {
    /// The network has too few nodes for the requested stage.
    ///
    /// The norm stage requires at least 2 nodes; the eigen/SVD stages
    /// require at least 3 (the truncation count `min(50, N - 2)` must be
    /// positive).
    #[error("graph too small: {node_count} node(s), {required} required for {stage}")]
    GraphTooSmall {
        /// Number of nodes in the offending network
        node_count: usize,
        /// Minimum node count for the stage that rejected it
        required: usize,
        /// Pipeline stage that enforced the bound
        stage: &'static str,
    },

    /// An iterative solver exhausted its restart budget without meeting
    /// its residual tolerance.
    #[error("{stage} solver failed to converge after {iterations} iteration(s)")]
    SolverNonconvergence {
        /// Which solver gave up ("eigen" or "svd")
        stage: &'static str,
        /// Total iterations spent before giving up
        iterations: usize,
    },
}

impl AnalysisError {
    /// Creates a new graph-too-small error.
    #[must_use]
    pub fn graph_too_small(node_count: usize, required: usize, stage: &'static str) -> Self {
        Self::GraphTooSmall {
            node_count,
            required,
            stage,
        }
    }

    /// Creates a new solver-nonconvergence error.
    #[must_use]
    pub fn nonconvergence(stage: &'static str, iterations: usize) -> Self {
        Self::SolverNonconvergence { stage, iterations }
    }

    /// Returns `true` if retrying with a larger iteration budget could
    /// succeed. Size gates are permanent for a given snapshot.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::SolverNonconvergence { .. } => true,
            Self::GraphTooSmall { .. } => false,
        }
    }
}
