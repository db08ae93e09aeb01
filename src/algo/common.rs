//! Shared utilities for graph algorithms
//!
//! Projects a snapshot into the dense, integer-indexed `GraphIndex` used by
//! `tidegraph-algorithms`, and maps algorithm results back to borrowed records.

use crate::graph::{GraphSnapshot, Link, Node};
use indexmap::IndexMap;
use tidegraph_algorithms::{GraphIndex, LinkIdx, NodeIdx};
use tracing::debug;

/// A snapshot together with its adjacency index.
///
/// The snapshot's node order defines slots `0..node_count`. Ids that only
/// appear as link endpoints get the following slots, in first-appearance
/// order, so they can be reported without inventing node records.
pub struct IndexedGraph<'g> {
    snapshot: &'g GraphSnapshot,
    index: GraphIndex,
    /// Dangling id -> slot
    dangling: IndexMap<&'g str, NodeIdx>,
}

impl<'g> IndexedGraph<'g> {
    /// Build the index in one pass over the links. O(V+E).
    pub fn new(snapshot: &'g GraphSnapshot) -> Self {
        let node_count = snapshot.node_count();
        let mut dangling: IndexMap<&'g str, NodeIdx> = IndexMap::new();
        let mut endpoints = Vec::with_capacity(snapshot.link_count());

        let slot = |id: &'g str, dangling: &mut IndexMap<&'g str, NodeIdx>| -> NodeIdx {
            match snapshot.node_position(id) {
                Some(pos) => pos,
                None => {
                    let next = node_count + dangling.len();
                    *dangling.entry(id).or_insert(next)
                }
            }
        };

        for link in snapshot.links() {
            let src = slot(link.source.as_str(), &mut dangling);
            let dst = slot(link.target.as_str(), &mut dangling);
            endpoints.push((src, dst));
        }

        let slot_count = node_count + dangling.len();
        let index = GraphIndex::from_endpoints(node_count, slot_count, endpoints);

        debug!(
            nodes = node_count,
            dangling_ids = dangling.len(),
            links = index.link_count(),
            "built adjacency index"
        );

        IndexedGraph {
            snapshot,
            index,
            dangling,
        }
    }

    pub fn snapshot(&self) -> &'g GraphSnapshot {
        self.snapshot
    }

    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// Slot of an id, resolved or dangling
    pub fn slot_of(&self, id: &str) -> Option<NodeIdx> {
        self.snapshot
            .node_position(id)
            .or_else(|| self.dangling.get(id).copied())
    }

    /// Id stored in a slot
    pub fn slot_id(&self, slot: NodeIdx) -> &'g str {
        if slot < self.index.node_count {
            self.snapshot.nodes()[slot].id.as_str()
        } else {
            self.dangling
                .get_index(slot - self.index.node_count)
                .map(|(id, _)| *id)
                .unwrap_or_default()
        }
    }

    /// Node record in a slot, `None` for dangling slots
    pub fn slot_node(&self, slot: NodeIdx) -> Option<&'g Node> {
        self.snapshot.nodes().get(slot)
    }

    /// Fast id -> node lookup
    pub fn node(&self, id: &str) -> Option<&'g Node> {
        self.snapshot.node(id)
    }

    pub fn link(&self, link: LinkIdx) -> &'g Link {
        &self.snapshot.links()[link]
    }

    /// Ids referenced by links but absent from the node set
    pub fn dangling_ids(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.dangling.keys().copied()
    }

    /// Links leaving `id`, in insertion order
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &'g Link> + '_ {
        let links: &[LinkIdx] = match self.slot_of(id) {
            Some(slot) => self.index.outgoing(slot),
            None => &[],
        };
        links.iter().map(move |&l| self.link(l))
    }

    /// Links entering `id`, in insertion order
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &'g Link> + '_ {
        let links: &[LinkIdx] = match self.slot_of(id) {
            Some(slot) => self.index.incoming(slot),
            None => &[],
        };
        links.iter().map(move |&l| self.link(l))
    }
}
