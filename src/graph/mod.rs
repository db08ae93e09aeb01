//! Entity graph data model
//!
//! This module implements the snapshot data model with:
//! - Nodes with a dotted type taxonomy and loosely typed attributes
//! - Directed, timestamped links; several records per pair model history
//! - An immutable snapshot that owns every record
//! - Borrowed subgraph views over a snapshot or a loaded partition

pub mod attribute;
pub mod link;
pub mod node;
pub mod snapshot;
pub mod subgraph;
pub mod types;

// Re-export main types
pub use attribute::{NodeAttribute, UNKNOWN_ATTRIBUTE, UNKNOWN_COUNTRY};
pub use link::Link;
pub use node::Node;
pub use snapshot::{normalize_nan_tokens, GraphError, GraphResult, GraphSnapshot};
pub use subgraph::{load_partition_path, load_partition_str, partition_to_json, OwnedSubgraph, Subgraph};
pub use types::{EntityType, LinkType, NodeId, TypeCategory};
