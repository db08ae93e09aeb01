//! Connected component extraction
//!
//! Partitions the graph into node-disjoint subgraphs, ignoring edge direction.

use super::common::{GraphIndex, LinkIdx, NodeIdx};
use std::collections::VecDeque;

/// One connected component
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// Resolved node slots in BFS visitation order
    pub nodes: Vec<NodeIdx>,
    /// Links in the order they were first touched
    pub links: Vec<LinkIdx>,
}

impl Component {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// Breadth-first walk over forward and backward adjacency from `start`.
///
/// `visited` and `link_seen` are shared across calls so a full partition stays
/// O(V+E). Dangling slots are never enqueued, but their links are still
/// collected once the resolved endpoint is reached.
fn walk_component(
    index: &GraphIndex,
    start: NodeIdx,
    visited: &mut [bool],
    link_seen: &mut [bool],
) -> Component {
    let mut component = Component::default();
    let mut queue = VecDeque::new();

    visited[start] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        component.nodes.push(current);

        for &link in index.outgoing(current) {
            if !link_seen[link] {
                link_seen[link] = true;
                component.links.push(link);
            }
            let next = index.target(link);
            if index.is_resolved(next) && !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }

        for &link in index.incoming(current) {
            if !link_seen[link] {
                link_seen[link] = true;
                component.links.push(link);
            }
            let next = index.source(link);
            if index.is_resolved(next) && !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    component
}

/// Extract the component containing `start`.
///
/// Returns `None` when `start` is not a resolved node.
pub fn extract_component(index: &GraphIndex, start: NodeIdx) -> Option<Component> {
    if !index.is_resolved(start) {
        return None;
    }
    let mut visited = vec![false; index.slot_count];
    let mut link_seen = vec![false; index.link_count()];
    Some(walk_component(index, start, &mut visited, &mut link_seen))
}

/// Partition every resolved node into exactly one component.
///
/// Nodes are scanned in slot order; the first unclaimed node claims and emits
/// its component, so component order follows the original node order.
pub fn partition_components(index: &GraphIndex) -> Vec<Component> {
    let mut visited = vec![false; index.slot_count];
    let mut link_seen = vec![false; index.link_count()];
    let mut components = Vec::new();

    for start in 0..index.node_count {
        if visited[start] {
            continue;
        }
        components.push(walk_component(index, start, &mut visited, &mut link_seen));
    }

    components
}
