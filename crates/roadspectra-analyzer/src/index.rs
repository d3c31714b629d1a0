//! Dense node indexing.
//!
//! Every analysis starts by assigning each node a dense integer index in
//! `[0, N)`, in the order the network iterates its nodes. The mapping is
//! rebuilt per run and discarded with the rest of the intermediate state.

use std::collections::HashMap;

use roadspectra_core::Node;

/// Bijection from node identifier to dense index.
#[derive(Debug, Clone)]
pub struct NodeIndex {
    map: HashMap<String, usize>,
}

impl NodeIndex {
    /// Build the index over a node sequence, one index per node in
    /// iteration order. An empty sequence yields an empty index; the
    /// pipeline entry gate decides whether that network is analyzable.
    #[must_use]
    pub fn build(nodes: &[Node]) -> Self {
        let map = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self { map }
    }

    /// Resolve a node identifier to its dense index.
    #[must_use]
    pub fn get(&self, node_id: &str) -> Option<usize> {
        self.map.get(node_id).copied()
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
