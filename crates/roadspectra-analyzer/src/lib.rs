//! # RoadSpectra Analyzer
//!
//! Spectral stability analysis of directed road networks. The network's
//! adjacency structure is treated as a discrete linear operator; the
//! analyzer computes its dominant eigenvalues, a truncated singular value
//! decomposition, an edge-importance ranking derived from the dominant
//! singular vectors, and norm-based fragility indicators (H2, H∞, and an
//! approximate Kreiss constant).
//!
//! ## Pipeline
//!
//! ```text
//! network → index → operator → (eigenvalues, SVD) → critical edge + norms → metrics
//! ```
//!
//! Each run is synchronous and single-threaded; independent networks are
//! embarrassingly parallel via [`analyze_batch`].
//!
//! ## Example
//!
//! ```rust
//! use roadspectra_analyzer::SpectralAnalyzer;
//! use roadspectra_core::{Edge, MemoryNetwork, Node};
//!
//! let nodes: Vec<Node> = (0..4).map(|i| Node::new(format!("n{i}"))).collect();
//! let edges: Vec<Edge> = (0..4)
//!     .map(|i| Edge {
//!         id: format!("e{i}"),
//!         name: None,
//!         from: format!("n{i}"),
//!         to: format!("n{}", (i + 1) % 4),
//!         shape: vec![],
//!         length: 100.0,
//!         lanes: 1,
//!     })
//!     .collect();
//! let network = MemoryNetwork::with_identity_projection(nodes, edges);
//!
//! let metrics = SpectralAnalyzer::new().analyze(&network).unwrap();
//! assert!((metrics.spectral_radius - 1.0).abs() < 1e-8);
//! ```

#![forbid(unsafe_code)]

pub mod analyzer;
pub mod backend;
pub mod index;
pub mod krylov;
pub mod operator;
pub mod ranking;
pub mod stability;
pub mod svd;

pub use analyzer::{
    analyze_batch, SpectralAnalyzer, MAX_EIGENVALUES, MAX_SINGULAR_TRIPLETS, MIN_NODES_NORM,
    MIN_NODES_SPECTRAL,
};
pub use backend::{KrylovBackend, SpectralBackend};
pub use index::NodeIndex;
pub use operator::{build_operator, CsrMatrix};
pub use ranking::rank_critical_edge;
pub use stability::{StabilityIndicators, KREISS_SAMPLE_SIZE, KREISS_SCALE};
pub use svd::{SingularDecomposition, SvdTriplets};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
