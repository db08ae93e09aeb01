//! Tidegraph
//!
//! Analysis engine for entity-relationship graphs: organizations, people and
//! timestamped relationship links, explored one immutable snapshot at a time.
//!
//! # Architecture
//!
//! - `graph`: data model. A `GraphSnapshot` owns every node and link record;
//!   everything derived from it borrows.
//! - `algo`: builds the CSR adjacency index (`tidegraph-algorithms`) for a
//!   snapshot and maps component and neighborhood results back to records.
//! - `analysis`: filter-aware per-subgraph statistics, member ranking and
//!   value profiles.
//! - `temporal`: active-link resolution at an instant, per-pair history and
//!   the playback clock.
//! - `cache`: stats tables memoized by snapshot version and filter.
//! - `config`: YAML-loadable defaults.
//!
//! ## Example Usage
//!
//! ```rust
//! use tidegraph::{analyze, expand_neighborhood, partition_all, GraphSnapshot, Link, Node};
//!
//! let snapshot = GraphSnapshot::new(
//!     vec![
//!         Node::new("A", "Entity.Organization.Company").with_revenue(100.0),
//!         Node::new("B", "Entity.Organization.Company").with_revenue(50.0),
//!         Node::new("C", "Entity.Person"),
//!     ],
//!     vec![
//!         Link::new("A", "B", "Event.Owns.Shareholdership", "2020-01-01T00:00:00"),
//!         Link::new("B", "C", "Event.WorksFor", "2021-01-01T00:00:00"),
//!     ],
//! );
//!
//! let subgraphs = partition_all(&snapshot);
//! let rows = analyze(&subgraphs, None);
//! assert_eq!(rows[0].stats.node_count, 3);
//! assert_eq!(rows[0].stats.biggest_revenue_org.as_deref(), Some("A"));
//!
//! let hood = expand_neighborhood(&snapshot, "B", 1);
//! assert_eq!(hood.nodes.len(), 3);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod analysis;
pub mod cache;
pub mod config;
pub mod graph;
pub mod temporal;

// Re-export main types for convenience
pub use graph::{
    load_partition_path, load_partition_str, partition_to_json, EntityType, GraphError,
    GraphResult, GraphSnapshot, Link, LinkType, Node, NodeAttribute, NodeId, OwnedSubgraph,
    Subgraph, TypeCategory,
};

pub use algo::{
    expand_neighborhood, extract_component, index_graph, partition_all, IndexedGraph,
    NeighborNode, Neighborhood,
};

pub use analysis::{
    analyze, compute_stats, country_counts, group_by_category, rank_members, FrequencyTable,
    GraphProfile, MemberKind, MemberOrder, MemberRow, RevenueRange, SortDirection, StatsFilter,
    StatsRow, SubgraphStats,
};

pub use temporal::{
    parse_timestamp, ClockDriver, ClockError, ClockState, ClockStatus, LinkTimeline,
    PairHistory, PlaybackClock, TemporalView, TimedLink,
};

pub use cache::StatsCache;

pub use config::{CacheConfig, ConfigError, ExplorerConfig, NeighborhoodConfig, PlaybackConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
