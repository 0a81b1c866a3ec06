//! Analysis benchmarks: full analysis, topological sort, and cycle search.
#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pipegraph_bench::{GeneratorConfig, SizeTier, generate_pipeline};
use pipegraph_core::{
    AnalysisConfig, GraphModel, NodeOrder, analyze_pipeline, analyze_with_config,
    find_all_cycles, is_acyclic, topological_sort,
};

const TIERS: [(&str, SizeTier); 4] = [
    ("S", SizeTier::Small),
    ("M", SizeTier::Medium),
    ("L", SizeTier::Large),
    ("XL", SizeTier::XLarge),
];

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for (name, tier) in TIERS {
        let pipeline = generate_pipeline(&tier.config(42));
        let elements = (pipeline.nodes.len() + pipeline.edges.len()) as u64;
        group.throughput(Throughput::Elements(elements));

        group.bench_with_input(BenchmarkId::new("dag", name), &pipeline, |b, p| {
            b.iter(|| analyze_pipeline(p));
        });

        let cyclic = generate_pipeline(&GeneratorConfig {
            inject_cycles: true,
            ..tier.config(42)
        });
        group.bench_with_input(BenchmarkId::new("cyclic", name), &cyclic, |b, p| {
            b.iter(|| analyze_pipeline(p));
        });

        let first_cycle_only = AnalysisConfig {
            collect_all_cycles: false,
            ..AnalysisConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new("cyclic_first_only", name),
            &cyclic,
            |b, p| {
                b.iter(|| analyze_with_config(&p.nodes, &p.edges, &first_cycle_only));
            },
        );
    }
    group.finish();
}

fn bench_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");

    for (name, tier) in TIERS {
        let pipeline = generate_pipeline(&tier.config(42));
        group.throughput(Throughput::Elements(pipeline.edges.len() as u64));

        group.bench_with_input(BenchmarkId::new("input_order", name), &pipeline, |b, p| {
            b.iter(|| GraphModel::build(&p.nodes, &p.edges));
        });
        group.bench_with_input(BenchmarkId::new("lexicographic", name), &pipeline, |b, p| {
            b.iter(|| {
                GraphModel::build_with_order(&p.nodes, &p.edges, NodeOrder::Lexicographic)
            });
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    for (name, tier) in TIERS {
        let pipeline = generate_pipeline(&tier.config(42));
        let model = GraphModel::build(&pipeline.nodes, &pipeline.edges);

        group.bench_function(BenchmarkId::new("topological_sort", name), |b| {
            b.iter(|| topological_sort(&model).expect("acyclic"));
        });
        group.bench_function(BenchmarkId::new("is_acyclic", name), |b| {
            b.iter(|| is_acyclic(&model));
        });

        let cyclic = generate_pipeline(&GeneratorConfig {
            inject_cycles: true,
            ..tier.config(42)
        });
        let cyclic_model = GraphModel::build(&cyclic.nodes, &cyclic.edges);
        group.bench_function(BenchmarkId::new("find_all_cycles", name), |b| {
            b.iter(|| find_all_cycles(&cyclic_model));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze, bench_graph_build, bench_queries);
criterion_main!(benches);
