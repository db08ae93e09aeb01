//! Depth-bounded neighborhood expansion
//!
//! Level-synchronous BFS over undirected links around one selected slot.

use super::common::{GraphIndex, LinkIdx, NodeIdx};

/// Result of a neighborhood expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborhoodResult {
    /// Visited slots, the selected one first
    pub nodes: Vec<NodeIdx>,
    /// Hop distance of each entry in `nodes`
    pub hops: Vec<usize>,
    /// Collected links in discovery order, each once
    pub links: Vec<LinkIdx>,
}

/// Expand `depth` levels around `start`.
///
/// At each level every link touching a frontier slot is collected, even when
/// its other end was visited earlier. Within a level links are discovered in
/// ascending link order, and unvisited endpoints (source before target) form
/// the next frontier. Dangling slots participate like any other slot.
pub fn expand_neighborhood(index: &GraphIndex, start: NodeIdx, depth: usize) -> NeighborhoodResult {
    let mut result = NeighborhoodResult::default();
    if start >= index.slot_count {
        return result;
    }

    let mut visited = vec![false; index.slot_count];
    let mut link_seen = vec![false; index.link_count()];

    visited[start] = true;
    result.nodes.push(start);
    result.hops.push(0);

    let mut frontier = vec![start];

    for level in 1..=depth {
        if frontier.is_empty() {
            break;
        }

        let mut level_links: Vec<LinkIdx> = frontier
            .iter()
            .flat_map(|&idx| index.outgoing(idx).iter().chain(index.incoming(idx)))
            .copied()
            .collect();
        level_links.sort_unstable();
        level_links.dedup();

        let mut next = Vec::new();
        for link in level_links {
            if !link_seen[link] {
                link_seen[link] = true;
                result.links.push(link);
            }
            let (src, dst) = index.endpoints[link];
            for end in [src, dst] {
                if !visited[end] {
                    visited[end] = true;
                    next.push(end);
                    result.nodes.push(end);
                    result.hops.push(level);
                }
            }
        }

        frontier = next;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> GraphIndex {
        // 0->1->2->3
        GraphIndex::from_endpoints(4, 4, vec![(0, 1), (1, 2), (2, 3)])
    }

    #[test]
    fn test_depth_zero_is_selection_only() {
        let result = expand_neighborhood(&chain(), 1, 0);
        assert_eq!(result.nodes, vec![1]);
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_undirected_levels() {
        let result = expand_neighborhood(&chain(), 1, 1);
        assert_eq!(result.nodes, vec![1, 0, 2]);
        assert_eq!(result.hops, vec![0, 1, 1]);
        assert_eq!(result.links, vec![0, 1]);

        let result = expand_neighborhood(&chain(), 1, 2);
        assert_eq!(result.nodes, vec![1, 0, 2, 3]);
        assert_eq!(result.hops, vec![0, 1, 1, 2]);
        assert_eq!(result.links, vec![0, 1, 2]);
    }

    #[test]
    fn test_links_between_visited_nodes_are_collected() {
        // Triangle 0-1-2: at depth 2 the 1->2 link is found from the level-1 frontier
        let index = GraphIndex::from_endpoints(3, 3, vec![(0, 1), (0, 2), (1, 2)]);

        let depth1 = expand_neighborhood(&index, 0, 1);
        assert_eq!(depth1.links, vec![0, 1]);

        let depth2 = expand_neighborhood(&index, 0, 2);
        assert_eq!(depth2.nodes, vec![0, 1, 2]);
        assert_eq!(depth2.links, vec![0, 1, 2]);
    }

    #[test]
    fn test_dangling_slot_is_reported() {
        let index = GraphIndex::from_endpoints(1, 2, vec![(0, 1)]);
        let result = expand_neighborhood(&index, 0, 3);
        assert_eq!(result.nodes, vec![0, 1]);
        assert_eq!(result.links, vec![0]);
    }

    #[test]
    fn test_out_of_range_start() {
        let result = expand_neighborhood(&chain(), 42, 2);
        assert!(result.nodes.is_empty());
    }
}
