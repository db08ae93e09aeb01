//! Relationship / event link record
//!
//! Links are directed and timestamped. Several links may connect the same
//! `(source, target)` pair; each one is a successive historical state of that
//! relationship.

use super::attribute::lenient_string;
use super::types::{LinkType, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A directed, timestamped link between two node ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Source node (link goes FROM this node)
    pub source: NodeId,

    /// Target node (link goes TO this node)
    pub target: NodeId,

    /// Type of relationship (e.g., "Event.WorksFor")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,

    /// Raw start instant
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub start_date: Option<String>,

    /// Raw end instant; absent means the relationship is still open
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub end_date: Option<String>,

    /// Any other keys, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Link {
    /// Create a new open link starting at `start_date`
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        link_type: impl Into<LinkType>,
        start_date: impl Into<String>,
    ) -> Self {
        Link {
            source: source.into(),
            target: target.into(),
            link_type: Some(link_type.into()),
            start_date: Some(start_date.into()),
            end_date: None,
            extra: IndexMap::new(),
        }
    }

    /// Close the validity interval
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Type string, `None` when the record carries no type
    pub fn type_str(&self) -> Option<&str> {
        self.link_type.as_ref().map(LinkType::as_str)
    }

    /// The `(source, target)` key shared by all historical records of a relationship
    pub fn pair(&self) -> (&NodeId, &NodeId) {
        (&self.source, &self.target)
    }

    /// Check if this link connects two specific nodes (in either direction)
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    /// Check if this link touches a node at either end
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
