//! Road network data model.
//!
//! A [`RoadNetwork`] is the analyzer's only input: a set of nodes, a set of
//! directed edges with projected geometry, and a projection capability that
//! converts local `(x, y)` coordinates into geographic `(lat, lon)` pairs.
//! The network is owned by whoever acquired it (an external collaborator);
//! the analyzer borrows a read-only view for the duration of one run.

use serde::{Deserialize, Serialize};

/// A point in the network's local projected coordinate system (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    /// East-West offset from the network origin (meters)
    pub x: f64,
    /// North-South offset from the network origin (meters)
    pub y: f64,
}

impl ProjectedPoint {
    /// Create a new projected point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A geographic WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A junction in the road network.
///
/// Nodes carry nothing beyond their stable external identifier; their
/// position in the network's iteration order determines their dense index
/// during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Stable external identifier
    pub id: String,
}

impl Node {
    /// Create a node from any id-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A directed street segment between two junctions.
///
/// Multiple edges may share the same endpoint pair; the adjacency operator
/// collapses them to a single unit weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Stable external identifier
    pub id: String,
    /// Human-readable street name, when the source data carries one
    pub name: Option<String>,
    /// Identifier of the source junction
    pub from: String,
    /// Identifier of the target junction
    pub to: String,
    /// Ordered polyline of the segment in projected coordinates
    pub shape: Vec<ProjectedPoint>,
    /// Physical length (meters)
    pub length: f64,
    /// Number of lanes
    pub lanes: u32,
}

impl Edge {
    /// The display name of this edge: its `name` when present, otherwise
    /// its identifier.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Read-only view of a road network plus its projection capability.
///
/// Implementations must keep `nodes()` and `edges()` iteration order stable
/// across calls: the dense node indexing and the critical-edge tie-break
/// both depend on it.
pub trait RoadNetwork {
    /// All junctions, in stable iteration order.
    fn nodes(&self) -> &[Node];

    /// All directed edges, in stable iteration order.
    fn edges(&self) -> &[Edge];

    /// Convert a projected `(x, y)` pair into geographic coordinates.
    fn project_to_geographic(&self, x: f64, y: f64) -> GeoPoint;
}

/// Projection function used by [`MemoryNetwork`].
pub type ProjectionFn = dyn Fn(f64, f64) -> GeoPoint + Send + Sync;

/// An in-memory [`RoadNetwork`] with a pluggable projection.
///
/// This is the implementation used by tests and by callers that load
/// network snapshots from files; acquisition pipelines with their own
/// native graph representation implement [`RoadNetwork`] directly.
pub struct MemoryNetwork {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    projection: Box<ProjectionFn>,
}

impl MemoryNetwork {
    /// Create a network with an explicit projection capability.
    pub fn new(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        projection: impl Fn(f64, f64) -> GeoPoint + Send + Sync + 'static,
    ) -> Self {
        Self {
            nodes,
            edges,
            projection: Box::new(projection),
        }
    }

    /// Create a network whose projection passes coordinates through
    /// unchanged (`x` as longitude, `y` as latitude). Useful for tests and
    /// for snapshots that are already geographic.
    pub fn with_identity_projection(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self::new(nodes, edges, |x, y| GeoPoint::new(y, x))
    }
}

impl RoadNetwork for MemoryNetwork {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn project_to_geographic(&self, x: f64, y: f64) -> GeoPoint {
        (self.projection)(x, y)
    }
}

impl std::fmt::Debug for MemoryNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryNetwork")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}
