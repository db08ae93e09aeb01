//! Filter-aware per-subgraph statistics
//!
//! Every subgraph is reduced independently, so the table is computed with
//! rayon and then stably sorted by surviving node count.

use crate::graph::{Node, Subgraph};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Inclusive revenue bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueRange {
    pub min: f64,
    pub max: f64,
}

impl RevenueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A floor of exactly 1 is the slider's "no floor" position and means 0.
    pub fn normalized(self) -> Self {
        if self.min == 1.0 {
            Self { min: 0.0, ..self }
        } else {
            self
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Node filter applied before aggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsFilter {
    /// `None` disables the revenue bound
    pub revenue_range: Option<RevenueRange>,
    /// Case-insensitive substring of the node id; empty matches all
    #[serde(default)]
    pub search_term: String,
    /// Allowed countries; empty matches all
    #[serde(default)]
    pub countries: BTreeSet<String>,
}

impl StatsFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_revenue_range(mut self, min: f64, max: f64) -> Self {
        self.revenue_range = Some(RevenueRange::new(min, max));
        self
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.countries.insert(country.into());
        self
    }

    /// Whether a node survives the filter
    pub fn admits(&self, node: &Node) -> bool {
        self.matcher().admits(node)
    }

    fn matcher(&self) -> FilterMatcher<'_> {
        FilterMatcher {
            range: self.revenue_range.map(RevenueRange::normalized),
            needle: self.search_term.to_lowercase(),
            countries: &self.countries,
        }
    }

    /// Stable digest of the normalized filter, used as a cache key
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        match self.revenue_range.map(RevenueRange::normalized) {
            Some(range) => {
                1u8.hash(&mut hasher);
                range.min.to_bits().hash(&mut hasher);
                range.max.to_bits().hash(&mut hasher);
            }
            None => 0u8.hash(&mut hasher),
        }
        self.search_term.to_lowercase().hash(&mut hasher);
        for country in &self.countries {
            country.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Filter with the search term lower-cased once
struct FilterMatcher<'f> {
    range: Option<RevenueRange>,
    needle: String,
    countries: &'f BTreeSet<String>,
}

impl FilterMatcher<'_> {
    fn admits(&self, node: &Node) -> bool {
        self.range.map_or(true, |r| r.contains(node.revenue()))
            && (self.needle.is_empty() || node.id.as_str().to_lowercase().contains(&self.needle))
            && (self.countries.is_empty() || self.countries.contains(node.country()))
    }
}

/// Aggregates for one subgraph after filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphStats {
    pub node_count: usize,
    pub link_count: usize,
    pub total_revenue: f64,
    pub average_revenue: f64,
    pub biggest_revenue_org: Option<String>,
    pub most_linked_org: Option<String>,
}

/// One row of the stats table; `index` points into the analyzed slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub index: usize,
    #[serde(flatten)]
    pub stats: SubgraphStats,
}

/// Compute stats for every subgraph, largest (by surviving nodes) first.
///
/// Ties keep the input order. Pure: equal inputs give equal output.
pub fn analyze(subgraphs: &[Subgraph<'_>], filter: Option<&StatsFilter>) -> Vec<StatsRow> {
    let matcher = filter.map(StatsFilter::matcher);

    let mut rows: Vec<StatsRow> = subgraphs
        .par_iter()
        .enumerate()
        .map(|(index, subgraph)| StatsRow {
            index,
            stats: subgraph_stats(subgraph, matcher.as_ref()),
        })
        .collect();

    rows.sort_by(|a, b| b.stats.node_count.cmp(&a.stats.node_count));

    debug!(subgraphs = subgraphs.len(), filtered = filter.is_some(), "computed subgraph stats");
    rows
}

/// Stats for a single subgraph
pub fn compute_stats(subgraph: &Subgraph<'_>, filter: Option<&StatsFilter>) -> SubgraphStats {
    let matcher = filter.map(StatsFilter::matcher);
    subgraph_stats(subgraph, matcher.as_ref())
}

fn subgraph_stats(subgraph: &Subgraph<'_>, matcher: Option<&FilterMatcher<'_>>) -> SubgraphStats {
    let nodes: Vec<&Node> = match matcher {
        Some(m) => subgraph.nodes.iter().copied().filter(|n| m.admits(n)).collect(),
        None => subgraph.nodes.clone(),
    };

    // Without a filter every link counts, dangling ones included.
    let survivors: Option<FxHashSet<&str>> =
        matcher.map(|_| nodes.iter().map(|n| n.id.as_str()).collect());

    let mut link_count = 0usize;
    let mut outgoing: FxHashMap<&str, usize> = FxHashMap::default();
    for link in &subgraph.links {
        let (src, dst) = (link.source.as_str(), link.target.as_str());
        if let Some(ids) = &survivors {
            if !ids.contains(src) || !ids.contains(dst) {
                continue;
            }
        }
        link_count += 1;
        *outgoing.entry(src).or_insert(0) += 1;
    }

    let mut total_revenue = 0.0;
    let mut biggest: Option<(&Node, f64)> = None;
    let mut most_linked: Option<(&Node, usize, f64)> = None;

    for &node in &nodes {
        let revenue = node.revenue();
        total_revenue += revenue;

        if !node.is_organization() {
            continue;
        }

        if biggest.map_or(true, |(_, best)| revenue > best) {
            biggest = Some((node, revenue));
        }

        let out = outgoing.get(node.id.as_str()).copied().unwrap_or(0);
        let better = match most_linked {
            None => true,
            Some((_, best_out, best_rev)) => out > best_out || (out == best_out && revenue > best_rev),
        };
        if better {
            most_linked = Some((node, out, revenue));
        }
    }

    let node_count = nodes.len();
    SubgraphStats {
        node_count,
        link_count,
        total_revenue,
        average_revenue: if node_count > 0 {
            total_revenue / node_count as f64
        } else {
            0.0
        },
        biggest_revenue_org: biggest.map(|(n, _)| n.id.to_string()),
        most_linked_org: most_linked.map(|(n, _, _)| n.id.to_string()),
    }
}
