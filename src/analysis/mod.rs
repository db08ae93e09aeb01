//! Filter-aware analytics over subgraphs and whole snapshots
//!
//! - `stats`: per-subgraph aggregates under a revenue/search/country filter
//! - `members`: degree-ranked member lists for one subgraph
//! - `profile`: value distributions and taxonomy grouping

pub mod members;
pub mod profile;
pub mod stats;

pub use members::{rank_members, MemberKind, MemberOrder, MemberRow, SortDirection};
pub use profile::{country_counts, group_by_category, FrequencyTable, GraphProfile};
pub use stats::{analyze, compute_stats, RevenueRange, StatsFilter, StatsRow, SubgraphStats};
