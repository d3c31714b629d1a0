//! Critical-edge ranking.
//!
//! Every edge is scored by how strongly its endpoints align with the
//! dominant singular directions: `importance = |u1[src] * v1[dst]|`. The
//! strict maximum is the network's structural bottleneck (the
//! Perron-Frobenius pivot); ties resolve to the first edge in the
//! network's iteration order, so the result is deterministic.

use roadspectra_core::{CriticalStreet, GeoPoint, RoadNetwork};

use crate::index::NodeIndex;

/// Find the critical edge, if any edge has both endpoints resolvable.
///
/// The winner's polyline is converted point-by-point from projected to
/// geographic coordinates via the network's projection capability, the
/// only place the analyzer touches coordinate systems.
#[must_use]
pub fn rank_critical_edge<N>(
    network: &N,
    index: &NodeIndex,
    u1: &[f64],
    v1: &[f64],
) -> Option<CriticalStreet>
where
    N: RoadNetwork + ?Sized,
{
    let mut max_importance = -1.0;
    let mut winner = None;

    for edge in network.edges() {
        let (Some(i), Some(j)) = (index.get(&edge.from), index.get(&edge.to)) else {
            continue;
        };
        let importance = (u1.get(i).copied().unwrap_or(0.0)
            * v1.get(j).copied().unwrap_or(0.0))
        .abs();
        if importance > max_importance {
            max_importance = importance;
            winner = Some(edge);
        }
    }

    winner.map(|edge| {
        let polyline: Vec<GeoPoint> = edge
            .shape
            .iter()
            .map(|p| network.project_to_geographic(p.x, p.y))
            .collect();
        CriticalStreet {
            id: edge.id.clone(),
            name: edge.display_name().to_string(),
            importance: max_importance,
            polyline,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadspectra_core::{Edge, MemoryNetwork, Node, ProjectedPoint};

    fn edge(id: &str, from: &str, to: &str) -> Edge {
        Edge {
            id: id.to_string(),
            name: None,
            from: from.to_string(),
            to: to.to_string(),
            shape: vec![ProjectedPoint::new(1.0, 2.0)],
            length: 1.0,
            lanes: 1,
        }
    }

    fn network(edges: Vec<Edge>) -> MemoryNetwork {
        let nodes = vec![Node::new("a"), Node::new("b"), Node::new("c")];
        MemoryNetwork::with_identity_projection(nodes, edges)
    }

    #[test]
    fn test_maximum_importance_wins() {
        let net = network(vec![edge("weak", "a", "b"), edge("strong", "b", "c")]);
        let index = NodeIndex::build(net.nodes());
        let u1 = [0.1, 0.9, 0.0];
        let v1 = [0.0, 0.2, 0.9];

        let critical = rank_critical_edge(&net, &index, &u1, &v1).unwrap();
        assert_eq!(critical.id, "strong");
        assert!((critical.importance - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_ties_resolve_to_first_edge() {
        let net = network(vec![edge("first", "a", "b"), edge("second", "a", "b")]);
        let index = NodeIndex::build(net.nodes());
        let u1 = [0.5, 0.0, 0.0];
        let v1 = [0.0, 0.5, 0.0];

        let critical = rank_critical_edge(&net, &index, &u1, &v1).unwrap();
        assert_eq!(critical.id, "first");
    }

    #[test]
    fn test_unresolvable_edges_are_skipped() {
        let net = network(vec![edge("dangling", "a", "ghost")]);
        let index = NodeIndex::build(net.nodes());
        let u1 = [1.0, 1.0, 1.0];
        let v1 = [1.0, 1.0, 1.0];

        assert!(rank_critical_edge(&net, &index, &u1, &v1).is_none());
    }

    #[test]
    fn test_polyline_is_geographic() {
        let net = network(vec![edge("only", "a", "b")]);
        let index = NodeIndex::build(net.nodes());
        let critical = rank_critical_edge(&net, &index, &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])
            .unwrap();

        // Identity projection maps (x, y) to (lat=y, lon=x)
        assert_eq!(critical.polyline, vec![GeoPoint::new(2.0, 1.0)]);
    }

    #[test]
    fn test_zero_importance_still_reports_an_edge() {
        let net = network(vec![edge("flat", "a", "b")]);
        let index = NodeIndex::build(net.nodes());
        let critical = rank_critical_edge(&net, &index, &[0.0; 3], &[0.0; 3]).unwrap();
        assert_eq!(critical.id, "flat");
        assert_eq!(critical.importance, 0.0);
    }
}
