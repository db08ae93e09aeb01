//! Immutable graph snapshot
//!
//! One snapshot per session: the sole owner of node and link records.
//! Every derived structure borrows from it and is recomputed, never patched.

use super::link::Link;
use super::node::Node;
use super::types::NodeId;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while building a snapshot
#[derive(Error, Debug)]
pub enum GraphError {
    /// The input does not have the expected `{nodes: [...], links: [...]}` shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// In-memory graph snapshot
///
/// - nodes: records in source order, ids unique
/// - links: records in source order, duplicates per pair allowed
/// - node_index: NodeId -> position in `nodes`
#[derive(Debug)]
pub struct GraphSnapshot {
    /// Process-unique version, used as a cache key
    version: u64,

    nodes: Vec<Node>,

    links: Vec<Link>,

    node_index: IndexMap<NodeId, usize>,
}

impl GraphSnapshot {
    /// Build a snapshot. Later nodes reusing an id are dropped.
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        let mut node_index = IndexMap::with_capacity(nodes.len());
        let mut unique = Vec::with_capacity(nodes.len());
        let mut duplicates = 0usize;

        for node in nodes {
            if node_index.contains_key(&node.id) {
                duplicates += 1;
                continue;
            }
            node_index.insert(node.id.clone(), unique.len());
            unique.push(node);
        }

        if duplicates > 0 {
            warn!(duplicates, "ignored nodes with duplicate ids");
        }

        let snapshot = GraphSnapshot {
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
            nodes: unique,
            links,
            node_index,
        };

        let dangling = snapshot.dangling_link_count();
        if dangling > 0 {
            warn!(dangling, "links reference ids missing from the node set");
        }
        info!(
            version = snapshot.version,
            nodes = snapshot.node_count(),
            links = snapshot.link_count(),
            "graph snapshot ready"
        );

        snapshot
    }

    /// Snapshot with no nodes and no links
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Build from an already parsed JSON value
    pub fn from_value(value: Value) -> GraphResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(GraphError::InvalidInput("graph must be a JSON object".to_string()));
        };

        let raw_nodes = take_array(&mut root, "nodes")?;
        let raw_links = take_array(&mut root, "links")?;

        let mut nodes = Vec::with_capacity(raw_nodes.len());
        for (i, raw) in raw_nodes.into_iter().enumerate() {
            if !raw.get("id").is_some_and(Value::is_string) {
                return Err(GraphError::InvalidInput(format!("node {} has no string id", i)));
            }
            let node = serde_json::from_value::<Node>(raw)
                .map_err(|e| GraphError::InvalidInput(format!("node {}: {}", i, e)))?;
            nodes.push(node);
        }

        let mut links = Vec::with_capacity(raw_links.len());
        for (i, raw) in raw_links.into_iter().enumerate() {
            for key in ["source", "target"] {
                if !raw.get(key).is_some_and(Value::is_string) {
                    return Err(GraphError::InvalidInput(format!("link {} has no string {}", i, key)));
                }
            }
            let link = serde_json::from_value::<Link>(raw)
                .map_err(|e| GraphError::InvalidInput(format!("link {}: {}", i, e)))?;
            links.push(link);
        }

        Ok(Self::new(nodes, links))
    }

    /// Parse a JSON document. Bare `NaN` tokens are read as `null`.
    pub fn from_json_str(raw: &str) -> GraphResult<Self> {
        let clean = normalize_nan_tokens(raw);
        let value: Value = serde_json::from_str(&clean)?;
        Self::from_value(value)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> GraphResult<Self> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        Self::from_json_str(&raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading graph snapshot");
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Position of a node in `nodes()`
    pub fn node_position(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Links with at least one endpoint missing from the node set
    pub fn dangling_link_count(&self) -> usize {
        self.links
            .iter()
            .filter(|l| !self.contains(l.source.as_str()) || !self.contains(l.target.as_str()))
            .count()
    }
}

/// Remove `key` from the root object; missing means empty, anything but an array is invalid.
fn take_array(root: &mut Map<String, Value>, key: &str) -> GraphResult<Vec<Value>> {
    match root.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => {
            if let Some(pos) = items.iter().position(|v| !v.is_object()) {
                return Err(GraphError::InvalidInput(format!("{}[{}] is not an object", key, pos)));
            }
            Ok(items)
        }
        Some(other) => Err(GraphError::InvalidInput(format!(
            "`{}` must be an array, found {}",
            key,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Replace bare `NaN` tokens (invalid JSON emitted by some exporters) with `null`.
pub fn normalize_nan_tokens(raw: &str) -> Cow<'_, str> {
    static NAN: OnceLock<Regex> = OnceLock::new();
    let re = NAN.get_or_init(|| Regex::new(r"\bNaN\b").expect("static pattern"));
    re.replace_all(raw, "null")
}
