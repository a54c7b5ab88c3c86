use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use encyclopedia::{Arboretum, Cardinality, Encyclopedia, Forest, Relation};

/// Wide, shallow forest: `size` sections, each with four paragraphs
fn document(size: usize) -> Forest<String> {
    let mut forest = Forest::new();
    for i in 0..size {
        let section = format!("Section{}", i);
        forest.set("Document".to_string(), section.clone()).unwrap();
        for p in 0..4 {
            forest.set(section.clone(), format!("Paragraph{}", p)).unwrap();
        }
    }
    forest
}

/// Benchmark relation assignment throughput per cardinality
fn bench_relation_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("relation_insertion");

    for cardinality in Cardinality::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(cardinality),
            &cardinality,
            |b, &cardinality| {
                b.iter(|| {
                    let mut relation = Relation::new(cardinality);
                    for i in 0..10_000u32 {
                        relation.set(i % 1000, i % 700).unwrap();
                    }
                    criterion::black_box(relation.pair_count());
                });
            },
        );
    }
    group.finish();
}

/// Benchmark inverse lookups against a forward scan
fn bench_relation_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("relation_lookup");

    let mut relation = Relation::general();
    for i in 0..10_000u32 {
        relation.set(i, i % 100).unwrap();
    }

    group.bench_function("keys_of", |b| {
        b.iter(|| {
            criterion::black_box(relation.keys_of(&42).map(|keys| keys.len()));
        });
    });

    group.bench_function("forward_scan", |b| {
        b.iter(|| {
            let count = relation.iter().filter(|(_, value)| **value == 42).count();
            criterion::black_box(count);
        });
    });

    group.finish();
}

/// Benchmark relation composition
fn bench_relation_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("relation_compose");

    for size in [100u32, 1000, 10_000].iter() {
        let mut first = Relation::function();
        let mut second = Relation::function();
        for i in 0..*size {
            first.set(i, i % 97).unwrap();
            second.set(i % 97, i % 13).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let composed = second.compose_with(&first).unwrap();
                criterion::black_box(composed.len());
            });
        });
    }
    group.finish();
}

/// Benchmark sprouting and grafting
fn bench_forest_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_build");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("sprout", size), size, |b, &size| {
            b.iter(|| criterion::black_box(document(size).node_count()));
        });

        let scion = document(4);
        group.bench_with_input(BenchmarkId::new("graft", size), size, |b, &size| {
            b.iter(|| {
                let mut forest = document(size);
                forest.graft(&"Paragraph0".to_string(), &scion).unwrap();
                criterion::black_box(forest.node_count());
            });
        });
    }
    group.finish();
}

/// Benchmark level queries and structural union
fn bench_forest_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_queries");

    let forest = document(1000);
    let copy = forest.reissue();

    group.bench_function("heights", |b| {
        b.iter(|| criterion::black_box(forest.heights(&"Paragraph3".to_string())));
    });

    group.bench_function("canopy", |b| {
        b.iter(|| criterion::black_box(forest.canopy().len()));
    });

    group.bench_function("union_dedup", |b| {
        b.iter(|| criterion::black_box(forest.union(&copy).unwrap().tree_count()));
    });

    group.bench_function("projection", |b| {
        b.iter(|| criterion::black_box(forest.get(&"Section500".to_string()).node_count()));
    });

    group.finish();
}

/// Benchmark attribute resolution depth
fn bench_attribute_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("attribute_lookup");

    for depth in [10usize, 100, 1000].iter() {
        let mut chain: Arboretum<usize, u32> = Arboretum::new();
        for level in 1..*depth {
            chain.set(level - 1, level).unwrap();
        }
        chain.set_attribute(&0, "weight", 1).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            b.iter(|| criterion::black_box(chain.get_attribute(&(depth - 1), "weight")));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_relation_insertion,
    bench_relation_lookup,
    bench_relation_compose,
    bench_forest_build,
    bench_forest_queries,
    bench_attribute_lookup,
);
criterion_main!(benches);
