//! Command implementations
//!
//! Each command renders to a `String` so `main` only prints.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tidegraph::analysis::FrequencyTable;
use tidegraph::{
    analyze, expand_neighborhood, extract_component, group_by_category, load_partition_path,
    parse_timestamp, partition_all, partition_to_json, rank_members, ClockDriver, ExplorerConfig,
    GraphProfile, GraphSnapshot, Link, LinkTimeline, MemberKind, MemberOrder, NodeAttribute,
    PlaybackClock, SortDirection, StatsCache, StatsFilter, Subgraph,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    All,
    Persons,
    Companies,
}

impl From<KindArg> for MemberKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::All => MemberKind::All,
            KindArg::Persons => MemberKind::Persons,
            KindArg::Companies => MemberKind::Companies,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderArg {
    Id,
    Degree,
}

impl From<OrderArg> for MemberOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Id => MemberOrder::Id,
            OrderArg::Degree => MemberOrder::Degree,
        }
    }
}

/// Loaded snapshot, configuration and the stats cache sized by it
pub struct Session {
    pub snapshot: GraphSnapshot,
    pub config: ExplorerConfig,
    pub stats_cache: StatsCache,
}

impl Session {
    pub fn load(graph: &Path, config: Option<&Path>) -> Result<Self> {
        let snapshot = GraphSnapshot::from_path(graph)
            .with_context(|| format!("failed to load graph {}", graph.display()))?;
        let config = match config {
            Some(path) => ExplorerConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ExplorerConfig::default(),
        };
        let stats_cache = StatsCache::from_config(&config.cache);
        Ok(Session {
            snapshot,
            config,
            stats_cache,
        })
    }
}

/// Filter flags of the `stats` command
#[derive(Debug, Default)]
pub struct StatsArgs {
    pub revenue: Option<(f64, f64)>,
    pub search: String,
    pub countries: Vec<String>,
    pub partition: Option<PathBuf>,
}

impl StatsArgs {
    /// `None` when no flag narrows the node set
    fn filter(&self) -> Option<StatsFilter> {
        if self.revenue.is_none() && self.search.is_empty() && self.countries.is_empty() {
            return None;
        }
        let mut filter = StatsFilter::new().with_search_term(self.search.clone());
        if let Some((min, max)) = self.revenue {
            filter = filter.with_revenue_range(min, max);
        }
        for country in &self.countries {
            filter = filter.with_country(country.clone());
        }
        Some(filter)
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| anyhow!("invalid instant: {}", raw))
}

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub fn run_components(session: &Session, export: Option<&Path>, format: OutputFormat) -> Result<String> {
    let subgraphs = partition_all(&session.snapshot);

    if let Some(path) = export {
        std::fs::write(path, partition_to_json(&subgraphs)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => to_json(&subgraphs),
        OutputFormat::Table => {
            let mut table = new_table(&["#", "Nodes", "Links", "First node"]);
            for (i, subgraph) in subgraphs.iter().enumerate() {
                table.add_row(vec![
                    i.to_string(),
                    subgraph.node_count().to_string(),
                    subgraph.link_count().to_string(),
                    subgraph.node_ids().next().unwrap_or("-").to_string(),
                ]);
            }
            Ok(format!("{}\n{} component(s)", table, subgraphs.len()))
        }
    }
}

pub fn run_stats(session: &mut Session, args: &StatsArgs, format: OutputFormat) -> Result<String> {
    let filter = args.filter();
    // the cache serves the snapshot's own partition only
    let rows = match &args.partition {
        Some(path) => {
            let loaded = load_partition_path(path)
                .with_context(|| format!("failed to load partition {}", path.display()))?;
            let subgraphs: Vec<Subgraph<'_>> = loaded.iter().map(|s| s.as_subgraph()).collect();
            analyze(&subgraphs, filter.as_ref())
        }
        None => {
            let subgraphs = partition_all(&session.snapshot);
            session
                .stats_cache
                .get_or_compute(&session.snapshot, &subgraphs, filter.as_ref())
        }
    };

    match format {
        OutputFormat::Json => to_json(&rows),
        OutputFormat::Table => {
            let mut table = new_table(&[
                "#",
                "Nodes",
                "Links",
                "Total revenue",
                "Avg revenue",
                "Biggest revenue org",
                "Most linked org",
            ]);
            for row in &rows {
                let stats = &row.stats;
                table.add_row(vec![
                    row.index.to_string(),
                    stats.node_count.to_string(),
                    stats.link_count.to_string(),
                    format!("{:.2}", stats.total_revenue),
                    format!("{:.2}", stats.average_revenue),
                    opt(stats.biggest_revenue_org.as_deref()).to_string(),
                    opt(stats.most_linked_org.as_deref()).to_string(),
                ]);
            }
            Ok(table.to_string())
        }
    }
}

pub fn run_expand(session: &Session, id: &str, depth: Option<usize>, format: OutputFormat) -> Result<String> {
    let depth = session.config.neighborhood.resolve_depth(depth);
    let hood = expand_neighborhood(&session.snapshot, id, depth);

    match format {
        OutputFormat::Json => to_json(&hood),
        OutputFormat::Table => {
            let mut table = new_table(&["Id", "Name", "Type", "Hops"]);
            for node in &hood.nodes {
                table.add_row(vec![
                    node.id.to_string(),
                    node.name.to_string(),
                    node.node_type.to_string(),
                    node.hops.to_string(),
                ]);
            }
            Ok(format!("{}\n{} node(s), {} link(s) within {} hop(s)", table, hood.nodes.len(), hood.links.len(), depth))
        }
    }
}

fn link_table(links: &[&Link]) -> Table {
    let mut table = new_table(&["Source", "Target", "Type", "Start", "End"]);
    for link in links {
        table.add_row(vec![
            link.source.to_string(),
            link.target.to_string(),
            opt(link.type_str()).to_string(),
            opt(link.start_date.as_deref()).to_string(),
            opt(link.end_date.as_deref()).to_string(),
        ]);
    }
    table
}

pub fn run_active(session: &Session, at: &str, format: OutputFormat) -> Result<String> {
    let t = parse_instant(at)?;
    let timeline = LinkTimeline::from_snapshot(&session.snapshot);
    let view = timeline.snapshot_at(t, &session.snapshot);

    match format {
        OutputFormat::Json => to_json(&view),
        OutputFormat::Table => Ok(format!(
            "{}\n{} active link(s), {} active node(s) at {}",
            link_table(&view.active_links),
            view.active_links.len(),
            view.active_nodes.len() + view.dangling_ids.len(),
            t.format("%Y-%m-%d")
        )),
    }
}

pub fn run_history(session: &Session, source: &str, target: &str, at: &str, format: OutputFormat) -> Result<String> {
    let t = parse_instant(at)?;
    let timeline = LinkTimeline::from_snapshot(&session.snapshot);
    let records = timeline.history_at(source, target, t);

    match format {
        OutputFormat::Json => to_json(&records),
        OutputFormat::Table => Ok(format!("{}\n{} record(s)", link_table(&records), records.len())),
    }
}

pub fn run_members(
    session: &Session,
    id: &str,
    kind: KindArg,
    order_by: OrderArg,
    asc: bool,
    format: OutputFormat,
) -> Result<String> {
    let component = extract_component(&session.snapshot, id).ok_or_else(|| anyhow!("unknown node: {}", id))?;
    let direction = if asc { SortDirection::Asc } else { SortDirection::Desc };
    let rows = rank_members(&component, kind.into(), order_by.into(), direction);

    match format {
        OutputFormat::Json => to_json(&rows),
        OutputFormat::Table => {
            let mut table = new_table(&["Id", "Type", "Links"]);
            for row in &rows {
                table.add_row(vec![
                    row.node.id.to_string(),
                    opt(row.node.type_str()).to_string(),
                    row.degree.to_string(),
                ]);
            }
            Ok(table.to_string())
        }
    }
}

const PROFILE_TOP: usize = 10;

fn frequency_section(title: &str, counts: &FrequencyTable) -> String {
    let mut table = new_table(&[title, "Count"]);
    for (value, count) in counts.iter().take(PROFILE_TOP) {
        table.add_row(vec![value.to_string(), count.to_string()]);
    }
    format!("{}\n{} distinct value(s)", table, counts.len())
}

pub fn run_profile(session: &Session, format: OutputFormat) -> Result<String> {
    let profile = GraphProfile::build(&session.snapshot);

    if format == OutputFormat::Json {
        return to_json(&profile);
    }

    let mut sections = Vec::new();
    for attribute in NodeAttribute::ALL {
        if let Some(counts) = profile.attribute(attribute) {
            sections.push(frequency_section(attribute.key(), counts));
        }
    }
    sections.push(frequency_section("link type", &profile.link_types));
    sections.push(frequency_section("link source", &profile.link_sources));
    sections.push(frequency_section("link target", &profile.link_targets));

    if let Some(types) = profile.node_types() {
        for (category, counts) in group_by_category(types) {
            sections.push(format!("{}: {} node(s)", category, counts.total()));
        }
    }
    for (category, counts) in group_by_category(&profile.link_types) {
        sections.push(format!("{}: {} link(s)", category, counts.total()));
    }

    sections.push(match profile.revenue_bounds {
        Some((lo, hi)) => format!("revenue: {:.2} .. {:.2}", lo, hi),
        None => "revenue: none".to_string(),
    });

    Ok(sections.join("\n\n"))
}

/// One printed step of playback
#[derive(Debug, Serialize)]
struct Frame {
    instant: DateTime<Utc>,
    active_links: usize,
    active_nodes: usize,
}

pub async fn run_play(session: &Session, ticks: Option<usize>, format: OutputFormat) -> Result<String> {
    let timeline = LinkTimeline::from_snapshot(&session.snapshot);
    let Some(clock) = PlaybackClock::for_timeline(&timeline, session.config.playback.steps) else {
        return Ok("no dated links to play".to_string());
    };

    let frame = |instant: DateTime<Utc>| Frame {
        instant,
        active_links: timeline.active_links_at(instant).len(),
        active_nodes: timeline.active_node_ids_at(instant).len(),
    };

    let driver = ClockDriver::spawn(clock, &session.config.playback);
    let mut updates = driver.subscribe();
    let mut last = driver.status();
    let mut frames = vec![frame(last.instant)];

    driver.play()?;
    while updates.changed().await.is_ok() {
        let status = *updates.borrow_and_update();
        if status.instant != last.instant {
            frames.push(frame(status.instant));
        }
        last = status;
        let done = ticks.is_some_and(|n| frames.len() > n);
        if !status.running || done {
            break;
        }
    }
    driver.shutdown();

    match format {
        OutputFormat::Json => to_json(&frames),
        OutputFormat::Table => {
            let mut table = new_table(&["Instant", "Active links", "Active nodes"]);
            for f in &frames {
                table.add_row(vec![
                    f.instant.format("%Y-%m-%d %H:%M").to_string(),
                    f.active_links.to_string(),
                    f.active_nodes.to_string(),
                ]);
            }
            Ok(table.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GRAPH: &str = r#"{
        "nodes": [
            {"id": "A", "type": "Entity.Organization.Company", "revenue": 100, "country": "Oceanus"},
            {"id": "B", "type": "Entity.Organization.Company", "revenue": NaN},
            {"id": "C", "type": "Entity.Person"},
            {"id": "D", "type": "Entity.Person"}
        ],
        "links": [
            {"source": "A", "target": "B", "type": "Event.Owns.Shareholdership", "start_date": "2020-01-01T00:00:00"},
            {"source": "B", "target": "C", "type": "Event.WorksFor", "start_date": "2021-01-01T00:00:00"}
        ]
    }"#;

    fn session() -> (NamedTempFile, Session) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(GRAPH.as_bytes()).unwrap();
        let session = Session::load(file.path(), None).unwrap();
        (file, session)
    }

    #[test]
    fn test_components_export() {
        let (_file, mut session) = session();
        let out = tempfile::tempdir().unwrap();
        let path = out.path().join("partition.json");

        let text = run_components(&session, Some(&path), OutputFormat::Table).unwrap();
        assert!(text.contains("2 component(s)"));

        // exported partition feeds back into stats
        let args = StatsArgs {
            partition: Some(path),
            ..Default::default()
        };
        let json = run_stats(&mut session, &args, OutputFormat::Json).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows[0]["nodeCount"], 3);
        assert_eq!(rows[0]["biggestRevenueOrg"], "A");
        assert!(session.stats_cache.is_empty());
    }

    #[test]
    fn test_stats_filter_flags() {
        let (_file, mut session) = session();
        let args = StatsArgs {
            countries: vec!["Oceanus".into()],
            ..Default::default()
        };
        let json = run_stats(&mut session, &args, OutputFormat::Json).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows[0]["nodeCount"], 1);
        assert_eq!(rows[0]["linkCount"], 0);
    }

    #[test]
    fn test_stats_reuses_cached_table() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(GRAPH.as_bytes()).unwrap();
        let mut config = NamedTempFile::new().unwrap();
        config.write_all(b"cache:\n  stats_capacity: 1\n").unwrap();
        let mut session = Session::load(file.path(), Some(config.path())).unwrap();

        let args = StatsArgs::default();
        let first = run_stats(&mut session, &args, OutputFormat::Json).unwrap();
        let second = run_stats(&mut session, &args, OutputFormat::Json).unwrap();
        assert_eq!(first, second);
        assert_eq!((session.stats_cache.hits(), session.stats_cache.misses()), (1, 1));

        let search = StatsArgs {
            search: "a".into(),
            ..Default::default()
        };
        run_stats(&mut session, &search, OutputFormat::Json).unwrap();
        assert_eq!(session.stats_cache.len(), 1);
    }

    #[test]
    fn test_expand_clamps_depth() {
        let (_file, session) = session();
        let json = run_expand(&session, "C", Some(10), OutputFormat::Json).unwrap();
        let hood: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(hood["depth"], 3);
        assert_eq!(hood["nodes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_active_and_history() {
        let (_file, session) = session();
        let text = run_active(&session, "2020-06-01", OutputFormat::Table).unwrap();
        assert!(text.contains("1 active link(s), 2 active node(s)"));

        let json = run_history(&session, "B", "C", "2022-01-01", OutputFormat::Json).unwrap();
        let records: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(records.as_array().unwrap().len(), 1);

        assert!(run_active(&session, "someday", OutputFormat::Table).is_err());
    }

    #[test]
    fn test_members() {
        let (_file, session) = session();
        let json = run_members(&session, "A", KindArg::Companies, OrderArg::Degree, false, OutputFormat::Json).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows[0]["node"]["id"], "B");
        assert_eq!(rows[0]["degree"], 2);

        assert!(run_members(&session, "nobody", KindArg::All, OrderArg::Id, true, OutputFormat::Table).is_err());
    }

    #[test]
    fn test_profile() {
        let (_file, session) = session();
        let text = run_profile(&session, OutputFormat::Table).unwrap();
        assert!(text.contains("revenue: 100.00 .. 100.00"));
        assert!(text.contains("Person: 2 node(s)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_runs_to_end() {
        let (_file, mut session) = session();
        session.config.playback.steps = 4;

        let json = run_play(&session, None, OutputFormat::Json).await.unwrap();
        let frames: serde_json::Value = serde_json::from_str(&json).unwrap();
        let frames = frames.as_array().unwrap();
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0]["active_links"], 1);
        assert_eq!(frames[4]["active_links"], 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_tick_limit() {
        let (_file, session) = session();
        let json = run_play(&session, Some(3), OutputFormat::Json).await.unwrap();
        let frames: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(frames.as_array().unwrap().len(), 4);
    }
}
