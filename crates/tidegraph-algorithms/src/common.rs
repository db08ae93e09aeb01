//! Shared utilities for graph algorithms
//!
//! Provides a read-only, dense view of the graph topology for algorithm execution.

/// Dense slot index of a node (0..slot_count)
pub type NodeIdx = usize;

/// Position of a link in the caller's link collection
pub type LinkIdx = usize;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Unlike a plain neighbor list, the CSR arrays hold *link* indices so that
/// parallel links between the same pair stay distinguishable.
///
/// Slots `0..node_count` are resolved nodes. Slots `node_count..slot_count`
/// are ids that only occur as link endpoints (dangling references).
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    /// Number of resolved nodes
    pub node_count: usize,
    /// Resolved nodes plus dangling endpoint ids
    pub slot_count: usize,
    /// (source, target) slot of every link, aligned with the link collection
    pub endpoints: Vec<(NodeIdx, NodeIdx)>,

    /// Offsets into `out_links`. Size = slot_count + 1
    pub out_offsets: Vec<usize>,
    /// Outgoing link indices grouped by source slot, insertion order preserved
    pub out_links: Vec<LinkIdx>,

    /// Offsets into `in_links`. Size = slot_count + 1
    pub in_offsets: Vec<usize>,
    /// Incoming link indices grouped by target slot, insertion order preserved
    pub in_links: Vec<LinkIdx>,
}

impl GraphIndex {
    /// Build the index in one counting pass over the link endpoints.
    ///
    /// Every endpoint must be `< slot_count`.
    pub fn from_endpoints(
        node_count: usize,
        slot_count: usize,
        endpoints: Vec<(NodeIdx, NodeIdx)>,
    ) -> Self {
        debug_assert!(node_count <= slot_count);

        let mut out_offsets = vec![0usize; slot_count + 1];
        let mut in_offsets = vec![0usize; slot_count + 1];

        for &(src, dst) in &endpoints {
            debug_assert!(src < slot_count && dst < slot_count);
            out_offsets[src + 1] += 1;
            in_offsets[dst + 1] += 1;
        }
        for i in 0..slot_count {
            out_offsets[i + 1] += out_offsets[i];
            in_offsets[i + 1] += in_offsets[i];
        }

        // Fill cursors start at each slot's offset; walking links in order keeps
        // per-slot lists in insertion order.
        let mut out_cursor = out_offsets.clone();
        let mut in_cursor = in_offsets.clone();
        let mut out_links = vec![0; endpoints.len()];
        let mut in_links = vec![0; endpoints.len()];

        for (link, &(src, dst)) in endpoints.iter().enumerate() {
            out_links[out_cursor[src]] = link;
            out_cursor[src] += 1;
            in_links[in_cursor[dst]] = link;
            in_cursor[dst] += 1;
        }

        GraphIndex {
            node_count,
            slot_count,
            endpoints,
            out_offsets,
            out_links,
            in_offsets,
            in_links,
        }
    }

    /// Number of links in the index
    pub fn link_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether a slot refers to a known node
    pub fn is_resolved(&self, idx: NodeIdx) -> bool {
        idx < self.node_count
    }

    /// Links leaving a slot
    pub fn outgoing(&self, idx: NodeIdx) -> &[LinkIdx] {
        &self.out_links[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    /// Links entering a slot
    pub fn incoming(&self, idx: NodeIdx) -> &[LinkIdx] {
        &self.in_links[self.in_offsets[idx]..self.in_offsets[idx + 1]]
    }

    /// Get the out-degree of a slot
    pub fn out_degree(&self, idx: NodeIdx) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a slot
    pub fn in_degree(&self, idx: NodeIdx) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Source slot of a link
    pub fn source(&self, link: LinkIdx) -> NodeIdx {
        self.endpoints[link].0
    }

    /// Target slot of a link
    pub fn target(&self, link: LinkIdx) -> NodeIdx {
        self.endpoints[link].1
    }
}
