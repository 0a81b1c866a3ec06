//! Document decoding and structural pre-check benchmarks.
#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pipegraph_bench::{GeneratorConfig, SizeTier, generate_pipeline};
use pipegraph_core::{CheckConfig, Pipeline, check};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, tier) in [
        ("S", SizeTier::Small),
        ("M", SizeTier::Medium),
        ("L", SizeTier::Large),
        ("XL", SizeTier::XLarge),
    ] {
        let pipeline = generate_pipeline(&GeneratorConfig {
            with_payload: true,
            ..tier.config(42)
        });
        let json = serde_json::to_string(&pipeline).expect("serialize");
        group.throughput(Throughput::Bytes(json.len() as u64));

        group.bench_with_input(BenchmarkId::new("from_json", name), &json, |b, json| {
            b.iter(|| Pipeline::from_json(json).expect("parse"));
        });
    }
    group.finish();
}

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");

    for (name, tier) in [
        ("S", SizeTier::Small),
        ("M", SizeTier::Medium),
        ("L", SizeTier::Large),
        ("XL", SizeTier::XLarge),
    ] {
        let pipeline = generate_pipeline(&GeneratorConfig {
            dangling_edges: 10,
            ..tier.config(42)
        });
        let elements = (pipeline.nodes.len() + pipeline.edges.len()) as u64;
        group.throughput(Throughput::Elements(elements));

        group.bench_with_input(BenchmarkId::new("default", name), &pipeline, |b, p| {
            let config = CheckConfig::default();
            b.iter(|| check(p, &config));
        });

        group.bench_with_input(BenchmarkId::new("strict_types", name), &pipeline, |b, p| {
            let config = CheckConfig::strict_types();
            b.iter(|| check(p, &config));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_check);
criterion_main!(benches);
