//! # RoadSpectra Core
//!
//! Core types for the road-network spectral stability analyzer:
//!
//! - **Network model**: [`Node`], [`Edge`], and the [`RoadNetwork`] trait
//!   that supplies nodes, edges, and the geographic projection capability.
//! - **Result record**: [`SpectralMetrics`], the immutable diagnostics
//!   produced by one analysis run.
//! - **Errors**: [`AnalysisError`] and the [`AnalysisResult`] alias.
//!
//! The numerical pipeline itself lives in `roadspectra-analyzer`; this
//! crate deliberately contains no linear algebra so that acquisition and
//! presentation collaborators can depend on the data model alone.

#![forbid(unsafe_code)]

pub mod error;
pub mod metrics;
pub mod network;

pub use error::{AnalysisError, AnalysisResult};
pub use metrics::{CriticalStreet, Eigenvalue, SpectralMetrics};
pub use network::{Edge, GeoPoint, MemoryNetwork, Node, ProjectedPoint, RoadNetwork};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
