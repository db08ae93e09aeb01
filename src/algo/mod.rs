//! Graph algorithms module
//!
//! Structural algorithms are implemented in the `tidegraph-algorithms` crate
//! over a dense `GraphIndex`. This module provides the integration/adapter
//! layer: it builds the index from a snapshot and maps results back to
//! records borrowed from that snapshot.

pub mod common;

pub use common::IndexedGraph;

use crate::graph::{GraphSnapshot, Link, Subgraph};
use serde::Serialize;
use tidegraph_algorithms::{Component, NeighborhoodResult};
use tracing::debug;

// Re-export algorithms
pub use tidegraph_algorithms::{
    expand_neighborhood as expand_index, extract_component as extract_index_component,
    partition_components, GraphIndex, LinkIdx, NodeIdx,
};

/// Type reported for neighborhood members without a type (or without a record)
pub const UNKNOWN_TYPE: &str = "Unknown";

/// One member of a neighborhood, resolved for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborNode<'a> {
    pub id: &'a str,
    /// Node name, or the id when the record has none
    pub name: &'a str,
    /// Node type, or `"Unknown"`
    #[serde(rename = "type")]
    pub node_type: &'a str,
    /// BFS level at which the node was reached
    pub hops: usize,
}

/// Depth-bounded neighborhood around a selected node
#[derive(Debug, Clone, Serialize)]
pub struct Neighborhood<'a> {
    pub selected: &'a str,
    pub depth: usize,
    pub nodes: Vec<NeighborNode<'a>>,
    pub links: Vec<&'a Link>,
}

impl<'a> Neighborhood<'a> {
    pub fn node_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

impl<'g> IndexedGraph<'g> {
    fn component_subgraph(&self, component: Component) -> Subgraph<'g> {
        Subgraph {
            nodes: component
                .nodes
                .iter()
                .filter_map(|&slot| self.slot_node(slot))
                .collect(),
            links: component.links.iter().map(|&l| self.link(l)).collect(),
        }
    }

    /// Connected component containing `start`, `None` when `start` is not a known node
    pub fn extract_component(&self, start: &str) -> Option<Subgraph<'g>> {
        let slot = self.snapshot().node_position(start)?;
        let component = extract_index_component(self.index(), slot)?;
        Some(self.component_subgraph(component))
    }

    /// Every known node in exactly one component, in first-node order
    pub fn partition_all(&self) -> Vec<Subgraph<'g>> {
        let components = partition_components(self.index());
        debug!(components = components.len(), "partitioned graph");
        components
            .into_iter()
            .map(|c| self.component_subgraph(c))
            .collect()
    }

    /// Undirected neighborhood of `selected` up to `depth` hops.
    ///
    /// An id that appears nowhere in the graph yields just itself.
    pub fn expand<'a>(&self, selected: &'a str, depth: usize) -> Neighborhood<'a>
    where
        'g: 'a,
    {
        let Some(start) = self.slot_of(selected) else {
            return Neighborhood {
                selected,
                depth,
                nodes: vec![NeighborNode {
                    id: selected,
                    name: selected,
                    node_type: UNKNOWN_TYPE,
                    hops: 0,
                }],
                links: Vec::new(),
            };
        };

        let NeighborhoodResult { nodes, hops, links } = expand_index(self.index(), start, depth);

        let nodes = nodes
            .into_iter()
            .zip(hops)
            .map(|(slot, hops)| {
                let id = self.slot_id(slot);
                match self.slot_node(slot) {
                    Some(node) => NeighborNode {
                        id,
                        name: node.display_name(),
                        node_type: node.type_str().unwrap_or(UNKNOWN_TYPE),
                        hops,
                    },
                    None => NeighborNode {
                        id,
                        name: id,
                        node_type: UNKNOWN_TYPE,
                        hops,
                    },
                }
            })
            .collect::<Vec<_>>();

        debug!(selected, depth, nodes = nodes.len(), links = links.len(), "expanded neighborhood");

        Neighborhood {
            selected,
            depth,
            nodes,
            links: links.into_iter().map(|l| self.link(l)).collect(),
        }
    }
}

/// Build the adjacency index for a snapshot
pub fn index_graph(snapshot: &GraphSnapshot) -> IndexedGraph<'_> {
    IndexedGraph::new(snapshot)
}

/// Partition a snapshot into connected components
pub fn partition_all(snapshot: &GraphSnapshot) -> Vec<Subgraph<'_>> {
    IndexedGraph::new(snapshot).partition_all()
}

/// Component containing `start`
pub fn extract_component<'g>(snapshot: &'g GraphSnapshot, start: &str) -> Option<Subgraph<'g>> {
    IndexedGraph::new(snapshot).extract_component(start)
}

/// Neighborhood of `selected` over the full, unfiltered snapshot
pub fn expand_neighborhood<'a>(
    snapshot: &'a GraphSnapshot,
    selected: &'a str,
    depth: usize,
) -> Neighborhood<'a> {
    IndexedGraph::new(snapshot).expand(selected, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    /// Two clusters: A -> B -> C and D <- E, plus a link into an unknown id.
    fn sample() -> GraphSnapshot {
        GraphSnapshot::new(
            vec![
                Node::new("A", "Entity.Organization.Company").with_name("Acme"),
                Node::new("B", "Entity.Organization.Company"),
                Node::new("C", "Entity.Person"),
                Node::new("D", "Entity.Person"),
                Node::new("E", "Entity.Organization.Company"),
            ],
            vec![
                Link::new("A", "B", "Event.Owns.Shareholdership", "2020-01-01T00:00:00"),
                Link::new("B", "C", "Event.WorksFor", "2021-01-01T00:00:00"),
                Link::new("E", "D", "Event.WorksFor", "2021-01-01T00:00:00"),
                Link::new("C", "Ghost", "Event.WorksFor", "2022-01-01T00:00:00"),
            ],
        )
    }

    #[test]
    fn test_partition_all() {
        let snapshot = sample();
        let parts = partition_all(&snapshot);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].node_ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(parts[0].link_count(), 3);
        assert_eq!(parts[1].node_ids().collect::<Vec<_>>(), vec!["D", "E"]);
        assert_eq!(parts[1].link_count(), 1);
    }

    #[test]
    fn test_extract_component() {
        let snapshot = sample();
        let component = extract_component(&snapshot, "D").unwrap();
        assert_eq!(component.node_ids().collect::<Vec<_>>(), vec!["D", "E"]);
        assert!(extract_component(&snapshot, "Ghost").is_none());
        assert!(extract_component(&snapshot, "nobody").is_none());
    }

    #[test]
    fn test_expand_depth_one() {
        let snapshot = sample();
        let hood = expand_neighborhood(&snapshot, "B", 1);

        assert_eq!(hood.node_ids().collect::<Vec<_>>(), vec!["B", "A", "C"]);
        assert_eq!(hood.nodes[0].hops, 0);
        assert_eq!(hood.nodes[1].name, "Acme");
        assert_eq!(hood.nodes[2].node_type, "Entity.Person");
        assert_eq!(hood.links.len(), 2);
    }

    #[test]
    fn test_expand_reaches_dangling_ids() {
        let snapshot = sample();
        let hood = expand_neighborhood(&snapshot, "B", 2);

        let ghost = hood.nodes.iter().find(|n| n.id == "Ghost").unwrap();
        assert_eq!(ghost.hops, 2);
        assert_eq!(ghost.name, "Ghost");
        assert_eq!(ghost.node_type, UNKNOWN_TYPE);
        assert_eq!(hood.links.len(), 3);
    }

    #[test]
    fn test_expand_depth_zero_and_unknown() {
        let snapshot = sample();
        let hood = expand_neighborhood(&snapshot, "A", 0);
        assert_eq!(hood.nodes.len(), 1);
        assert!(hood.links.is_empty());

        let hood = expand_neighborhood(&snapshot, "nobody", 3);
        assert_eq!(hood.node_ids().collect::<Vec<_>>(), vec!["nobody"]);
        assert_eq!(hood.nodes[0].node_type, UNKNOWN_TYPE);
        assert!(hood.links.is_empty());
    }

    #[test]
    fn test_neighborhood_serializes_type_field() {
        let snapshot = sample();
        let hood = expand_neighborhood(&snapshot, "D", 1);
        let json = serde_json::to_value(&hood).unwrap();
        assert_eq!(json["nodes"][0]["type"], "Entity.Person");
        assert_eq!(json["selected"], "D");
    }
}
