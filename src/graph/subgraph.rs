//! Subgraph views and externally supplied partitions
//!
//! A `Subgraph` borrows its records from a snapshot (or from an
//! `OwnedSubgraph` loaded from a precomputed partition file), so analysis code
//! is written once against borrowed records.

use super::link::Link;
use super::node::Node;
use super::snapshot::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// A connected component (or any node/link selection) borrowed from its owner
#[derive(Debug, Clone, Default, Serialize)]
pub struct Subgraph<'g> {
    pub nodes: Vec<&'g Node>,
    pub links: Vec<&'g Link>,
}

impl<'g> Subgraph<'g> {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id.as_str() == id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.nodes.iter().map(|&n| n.id.as_str())
    }

    /// Detach into an owned copy, e.g. for export
    pub fn to_owned_subgraph(&self) -> OwnedSubgraph {
        OwnedSubgraph {
            nodes: self.nodes.iter().map(|&n| n.clone()).collect(),
            links: self.links.iter().map(|&l| l.clone()).collect(),
        }
    }
}

/// Deserialized partition entry `{nodes: [...], links: [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnedSubgraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl OwnedSubgraph {
    pub fn as_subgraph(&self) -> Subgraph<'_> {
        Subgraph {
            nodes: self.nodes.iter().collect(),
            links: self.links.iter().collect(),
        }
    }
}

/// Parse a precomputed partition: a JSON array of `{nodes, links}` objects.
pub fn load_partition_str(raw: &str) -> GraphResult<Vec<OwnedSubgraph>> {
    let clean = super::snapshot::normalize_nan_tokens(raw);
    let value: Value = serde_json::from_str(&clean)?;
    let Value::Array(items) = value else {
        return Err(GraphError::InvalidInput("partition must be a JSON array".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(GraphError::InvalidInput(format!("subgraph {} is not an object", i)));
            }
            serde_json::from_value(item)
                .map_err(|e| GraphError::InvalidInput(format!("subgraph {}: {}", i, e)))
        })
        .collect()
}

pub fn load_partition_path(path: impl AsRef<Path>) -> GraphResult<Vec<OwnedSubgraph>> {
    let raw = std::fs::read_to_string(path)?;
    load_partition_str(&raw)
}

/// Serialize a partition in the same shape `load_partition_str` reads.
pub fn partition_to_json(subgraphs: &[Subgraph<'_>]) -> GraphResult<String> {
    Ok(serde_json::to_string_pretty(subgraphs)?)
}
