//! Network snapshot files.
//!
//! The CLI consumes road networks saved as JSON snapshots: a node list, an
//! edge list with projected shapes, and an optional geographic origin.
//! When an origin is present the snapshot's local `(x, y)` meters are
//! mapped to WGS84 with an equirectangular approximation around it;
//! without one, coordinates are passed through as already geographic.
//! Acquisition from live map sources stays outside this tool.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use roadspectra_core::{Edge, GeoPoint, MemoryNetwork, Node};

/// Meters per degree of latitude.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// On-disk snapshot of one road network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFile {
    /// Display name used for report and feature-table rows
    pub name: String,
    /// Geographic anchor of the projected coordinate system, when known
    #[serde(default)]
    pub origin: Option<GeoPoint>,
    /// Junctions, in analysis iteration order
    pub nodes: Vec<Node>,
    /// Directed edges, in analysis iteration order
    pub edges: Vec<Edge>,
}

impl NetworkFile {
    /// Load a snapshot from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading network snapshot {}", path.display()))?;
        let file: NetworkFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing network snapshot {}", path.display()))?;
        Ok(file)
    }

    /// Convert into the analyzer's in-memory network, attaching the
    /// projection capability implied by the snapshot's origin.
    pub fn into_network(self) -> (String, MemoryNetwork) {
        let NetworkFile {
            name,
            origin,
            nodes,
            edges,
        } = self;

        let network = match origin {
            Some(anchor) => {
                let lat_rad = anchor.lat.to_radians();
                MemoryNetwork::new(nodes, edges, move |x, y| {
                    let lat = anchor.lat + y / METERS_PER_DEGREE;
                    let lon = anchor.lon + x / (METERS_PER_DEGREE * lat_rad.cos());
                    GeoPoint::new(lat, lon)
                })
            }
            None => MemoryNetwork::with_identity_projection(nodes, edges),
        };
        (name, network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadspectra_core::RoadNetwork;

    const SNAPSHOT: &str = r#"{
        "name": "testville",
        "origin": {"lat": 48.85, "lon": 2.35},
        "nodes": [{"id": "a"}, {"id": "b"}],
        "edges": [{
            "id": "e1",
            "name": "Rue Principale",
            "from": "a",
            "to": "b",
            "shape": [{"x": 0.0, "y": 0.0}, {"x": 100.0, "y": 0.0}],
            "length": 100.0,
            "lanes": 2
        }]
    }"#;

    #[test]
    fn test_snapshot_parses_and_projects() {
        let file: NetworkFile = serde_json::from_str(SNAPSHOT).unwrap();
        let (name, network) = file.into_network();

        assert_eq!(name, "testville");
        assert_eq!(network.nodes().len(), 2);
        assert_eq!(network.edges()[0].display_name(), "Rue Principale");

        let g = network.project_to_geographic(0.0, 0.0);
        assert!((g.lat - 48.85).abs() < 1e-9);
        assert!((g.lon - 2.35).abs() < 1e-9);

        // 111320 m north is one degree of latitude
        let g = network.project_to_geographic(0.0, 111_320.0);
        assert!((g.lat - 49.85).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_without_origin_uses_identity() {
        let raw = r#"{"name": "geo", "nodes": [], "edges": []}"#;
        let file: NetworkFile = serde_json::from_str(raw).unwrap();
        let (_, network) = file.into_network();
        let g = network.project_to_geographic(2.35, 48.85);
        assert_eq!(g.lon, 2.35);
        assert_eq!(g.lat, 48.85);
    }
}
