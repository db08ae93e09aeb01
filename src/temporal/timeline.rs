//! Link validity over time
//!
//! Links are parsed and sorted by start instant once; every query is then a
//! pure function of the timeline and an instant.

use crate::graph::{GraphSnapshot, Link, Node};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, warn};

/// Primary timestamp layout of the link records
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const FALLBACK_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a link date as UTC.
///
/// Tries the primary layout, then RFC 3339, a few common variants, and
/// finally a bare date at midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Some(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in FALLBACK_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A link with its parsed validity interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedLink<'g> {
    pub link: &'g Link,
    pub start: DateTime<Utc>,
    /// `None` while the relationship is still open
    pub end: Option<DateTime<Utc>>,
}

impl TimedLink<'_> {
    pub fn is_active_at(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && self.end.map_or(true, |end| end >= t)
    }
}

type Pair<'g> = (&'g str, &'g str);

/// Every historical record of one `(source, target)` pair up to an instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairHistory<'g> {
    pub source: &'g str,
    pub target: &'g str,
    pub records: Vec<&'g Link>,
}

/// Active state of a snapshot at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalView<'g> {
    pub instant: DateTime<Utc>,
    pub active_links: Vec<&'g Link>,
    /// Known nodes touched by an active link, in snapshot order
    pub active_nodes: Vec<&'g Node>,
    /// Touched ids with no node record
    pub dangling_ids: Vec<&'g str>,
    /// History of each active pair
    pub history: Vec<PairHistory<'g>>,
}

/// Links sorted by start instant plus a per-pair history table
#[derive(Debug, Clone)]
pub struct LinkTimeline<'g> {
    /// Ascending by start; ties keep input order
    links: Vec<TimedLink<'g>>,
    /// Pair -> positions in `links`, ascending
    history: IndexMap<Pair<'g>, Vec<usize>>,
    /// Links whose start date could not be parsed
    skipped: usize,
}

impl<'g> LinkTimeline<'g> {
    pub fn new(links: impl IntoIterator<Item = &'g Link>) -> Self {
        let mut timed = Vec::new();
        let mut skipped = 0usize;

        for link in links {
            let Some(start) = link.start_date.as_deref().and_then(parse_timestamp) else {
                skipped += 1;
                continue;
            };
            let end = match link.end_date.as_deref() {
                None => None,
                Some(raw) => {
                    let parsed = parse_timestamp(raw);
                    if parsed.is_none() {
                        warn!(source = %link.source, target = %link.target, end_date = raw, "unparseable end date, treating link as open");
                    }
                    parsed
                }
            };
            timed.push(TimedLink { link, start, end });
        }

        if skipped > 0 {
            warn!(skipped, "links without a parseable start date are never active");
        }

        timed.sort_by_key(|t| t.start);

        let mut history: IndexMap<Pair<'g>, Vec<usize>> = IndexMap::new();
        for (pos, timed_link) in timed.iter().enumerate() {
            let link = timed_link.link;
            history
                .entry((link.source.as_str(), link.target.as_str()))
                .or_default()
                .push(pos);
        }

        debug!(links = timed.len(), pairs = history.len(), "built link timeline");

        LinkTimeline {
            links: timed,
            history,
            skipped,
        }
    }

    pub fn from_snapshot(snapshot: &'g GraphSnapshot) -> Self {
        Self::new(snapshot.links())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn timed_links(&self) -> &[TimedLink<'g>] {
        &self.links
    }

    /// Earliest and latest start instant
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.links.first()?.start, self.links.last()?.start))
    }

    /// Active links at `t`, one per pair: the one with the latest start.
    ///
    /// Output follows the order in which each pair first becomes active.
    pub fn active_links_at(&self, t: DateTime<Utc>) -> Vec<&'g Link> {
        let mut latest: IndexMap<Pair<'g>, &TimedLink<'g>> = IndexMap::new();

        for timed in &self.links {
            // sorted by start: nothing later can be active
            if timed.start > t {
                break;
            }
            if !timed.is_active_at(t) {
                continue;
            }
            let link = timed.link;
            let key = (link.source.as_str(), link.target.as_str());
            match latest.get_mut(&key) {
                Some(kept) if timed.start > kept.start => *kept = timed,
                Some(_) => {}
                None => {
                    latest.insert(key, timed);
                }
            }
        }

        debug!(instant = %t, active = latest.len(), "resolved active links");
        latest.into_values().map(|timed| timed.link).collect()
    }

    /// Ids touched by an active link at `t`, in first-appearance order
    pub fn active_node_ids_at(&self, t: DateTime<Utc>) -> Vec<&'g str> {
        touched_ids(&self.active_links_at(t)).into_iter().collect()
    }

    /// Records of one pair that started at or before `t`, ascending
    pub fn history_at(&self, source: &str, target: &str, t: DateTime<Utc>) -> Vec<&'g Link> {
        self.history
            .get(&(source, target))
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| &self.links[pos])
                    .take_while(|timed| timed.start <= t)
                    .map(|timed| timed.link)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Everything needed to draw the graph at `t`
    pub fn snapshot_at(&self, t: DateTime<Utc>, snapshot: &'g GraphSnapshot) -> TemporalView<'g> {
        let active_links = self.active_links_at(t);
        let touched = touched_ids(&active_links);

        let active_nodes = snapshot
            .nodes()
            .iter()
            .filter(|n| touched.contains(n.id.as_str()))
            .collect();
        let dangling_ids = touched
            .iter()
            .copied()
            .filter(|id| !snapshot.contains(id))
            .collect();

        let history = active_links
            .iter()
            .map(|link| PairHistory {
                source: link.source.as_str(),
                target: link.target.as_str(),
                records: self.history_at(link.source.as_str(), link.target.as_str(), t),
            })
            .collect();

        TemporalView {
            instant: t,
            active_links,
            active_nodes,
            dangling_ids,
            history,
        }
    }
}

fn touched_ids<'g>(links: &[&'g Link]) -> IndexSet<&'g str> {
    let mut ids = IndexSet::new();
    for link in links {
        ids.insert(link.source.as_str());
        ids.insert(link.target.as_str());
    }
    ids
}
