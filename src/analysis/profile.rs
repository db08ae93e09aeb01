//! Whole-graph value distributions
//!
//! Used to sanity-check a freshly loaded snapshot and to feed the taxonomy
//! and country breakdowns.

use crate::graph::{GraphSnapshot, NodeAttribute, TypeCategory, UNKNOWN_ATTRIBUTE};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Value -> occurrences, in first-seen order until sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: IndexMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &str) {
        match self.counts.get_mut(value) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(value.to_string(), 1);
            }
        }
    }

    pub fn get(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Reorder by count, highest first; equal counts keep first-seen order.
    pub fn sorted_desc(mut self) -> Self {
        self.counts.sort_by(|_, a, _, b| b.cmp(a));
        self
    }
}

impl<'a> FromIterator<&'a str> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for value in iter {
            table.add(value);
        }
        table
    }
}

/// Distribution of every profiled field in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphProfile {
    /// Keyed by attribute; missing values count as `"UNKNOWN"`
    pub attributes: BTreeMap<NodeAttribute, FrequencyTable>,
    pub link_types: FrequencyTable,
    pub link_sources: FrequencyTable,
    pub link_targets: FrequencyTable,
    /// Smallest and largest parsed revenue, `None` when no node has one
    pub revenue_bounds: Option<(f64, f64)>,
}

impl GraphProfile {
    pub fn build(snapshot: &GraphSnapshot) -> Self {
        let mut attributes: BTreeMap<NodeAttribute, FrequencyTable> = NodeAttribute::ALL
            .iter()
            .map(|&attr| (attr, FrequencyTable::new()))
            .collect();
        let mut revenue_bounds: Option<(f64, f64)> = None;

        for node in snapshot.nodes() {
            for (&attr, table) in attributes.iter_mut() {
                table.add(node.attribute(attr));
            }
            if let Some(revenue) = node.revenue.filter(|r| r.is_finite()) {
                revenue_bounds = Some(match revenue_bounds {
                    None => (revenue, revenue),
                    Some((lo, hi)) => (lo.min(revenue), hi.max(revenue)),
                });
            }
        }

        let mut link_types = FrequencyTable::new();
        let mut link_sources = FrequencyTable::new();
        let mut link_targets = FrequencyTable::new();
        for link in snapshot.links() {
            link_types.add(link.type_str().unwrap_or(UNKNOWN_ATTRIBUTE));
            link_sources.add(link.source.as_str());
            link_targets.add(link.target.as_str());
        }

        debug!(
            nodes = snapshot.node_count(),
            links = snapshot.link_count(),
            "built graph profile"
        );

        GraphProfile {
            attributes: attributes
                .into_iter()
                .map(|(attr, table)| (attr, table.sorted_desc()))
                .collect(),
            link_types: link_types.sorted_desc(),
            link_sources: link_sources.sorted_desc(),
            link_targets: link_targets.sorted_desc(),
            revenue_bounds,
        }
    }

    pub fn attribute(&self, attribute: NodeAttribute) -> Option<&FrequencyTable> {
        self.attributes.get(&attribute)
    }

    /// Node type distribution
    pub fn node_types(&self) -> Option<&FrequencyTable> {
        self.attribute(NodeAttribute::Type)
    }
}

/// Country occurrences with missing countries as `"Unknown"`, in first-seen order
pub fn country_counts(snapshot: &GraphSnapshot) -> FrequencyTable {
    snapshot.nodes().iter().map(|n| n.country()).collect()
}

/// Split a type distribution into taxonomy groups.
///
/// Types outside Person, Organization, Event and Relationship are dropped.
pub fn group_by_category(counts: &FrequencyTable) -> BTreeMap<TypeCategory, FrequencyTable> {
    let mut groups: BTreeMap<TypeCategory, FrequencyTable> = BTreeMap::new();
    for (type_name, count) in counts.iter() {
        let category = TypeCategory::of(type_name);
        if category == TypeCategory::Other {
            continue;
        }
        let table = groups.entry(category).or_default();
        table.counts.insert(type_name.to_string(), count);
    }
    groups
        .into_iter()
        .map(|(category, table)| (category, table.sorted_desc()))
        .collect()
}
