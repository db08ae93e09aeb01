use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use tidegraph::{
    analyze, expand_neighborhood, partition_all, GraphSnapshot, Link, LinkTimeline, Node,
    StatsFilter,
};

const TYPES: [&str; 4] = [
    "Entity.Organization.Company",
    "Entity.Organization.FishingCompany",
    "Entity.Person",
    "Entity.Person.CEO",
];

const LINK_TYPES: [&str; 3] = ["Event.WorksFor", "Event.Owns.Shareholdership", "Relationship.FamilyRelationship"];

/// Random sparse graph, roughly two links per node, with repeated pairs
fn random_graph(size: usize, seed: u64) -> GraphSnapshot {
    let mut rng = StdRng::seed_from_u64(seed);

    let nodes = (0..size)
        .map(|i| {
            Node::new(format!("N{}", i), TYPES[i % TYPES.len()])
                .with_revenue(rng.gen_range(0.0..1_000_000.0))
                .with_country(["Oceanus", "Zawalinda", "Kondanovia"][i % 3])
        })
        .collect();

    let links = (0..size * 2)
        .map(|_| {
            let src = rng.gen_range(0..size);
            let dst = rng.gen_range(0..size);
            let year = rng.gen_range(2000..2030);
            Link::new(
                format!("N{}", src),
                format!("N{}", dst),
                LINK_TYPES[src % LINK_TYPES.len()],
                format!("{}-01-01T00:00:00", year),
            )
        })
        .collect();

    GraphSnapshot::new(nodes, links)
}

/// Benchmark full partitioning into connected components
fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_all");

    for size in [1_000, 10_000, 50_000].iter() {
        let snapshot = random_graph(*size, 7);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                criterion::black_box(partition_all(&snapshot).len());
            });
        });
    }
    group.finish();
}

/// Benchmark filtered stats over a precomputed partition
fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for size in [1_000, 10_000, 50_000].iter() {
        let snapshot = random_graph(*size, 11);
        let subgraphs = partition_all(&snapshot);
        let filter = StatsFilter::new()
            .with_revenue_range(1.0, 500_000.0)
            .with_country("Oceanus");

        group.bench_with_input(BenchmarkId::new("unfiltered", size), size, |b, _| {
            b.iter(|| criterion::black_box(analyze(&subgraphs, None)));
        });
        group.bench_with_input(BenchmarkId::new("filtered", size), size, |b, _| {
            b.iter(|| criterion::black_box(analyze(&subgraphs, Some(&filter))));
        });
    }
    group.finish();
}

/// Benchmark neighborhood expansion at the depths the explorer offers
fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand_neighborhood");
    let snapshot = random_graph(10_000, 13);

    for depth in [1usize, 2, 3].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            b.iter(|| criterion::black_box(expand_neighborhood(&snapshot, "N42", depth).nodes.len()));
        });
    }
    group.finish();
}

/// Benchmark timeline construction and active-link resolution
fn bench_temporal(c: &mut Criterion) {
    let mut group = c.benchmark_group("temporal");
    let snapshot = random_graph(10_000, 17);

    group.bench_function("build_timeline", |b| {
        b.iter(|| criterion::black_box(LinkTimeline::from_snapshot(&snapshot).len()));
    });

    let timeline = LinkTimeline::from_snapshot(&snapshot);
    let Some((min, max)) = timeline.bounds() else {
        return;
    };
    let mid = min + (max - min) / 2;
    group.bench_function("active_links_at", |b| {
        b.iter(|| criterion::black_box(timeline.active_links_at(mid).len()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_partition,
    bench_stats,
    bench_expand,
    bench_temporal,
);
criterion_main!(benches);
