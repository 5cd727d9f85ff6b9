// benches/tiers.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use alchemy_scrape::config::options::ResolveOptions;
use alchemy_scrape::graph::EntityGraph;
use alchemy_scrape::specs::elements::parse_document;
use alchemy_scrape::tier;

/// Layered graph roughly the size of the real table: `width` elements per layer,
/// each made from two elements of the layer below, two recipes apiece.
fn layered(layers: usize, width: usize) -> EntityGraph {
    let mut g = EntityGraph::new();
    let name = |l: usize, i: usize| format!("E{l}_{i}");
    for i in 0..width {
        g.insert(&name(0, i));
    }
    for l in 1..layers {
        for i in 0..width {
            let id = g.insert(&name(l, i)).unwrap_or_default();
            g.add_recipe(id, vec![name(l - 1, i), name(l - 1, (i + 1) % width)]);
            g.add_recipe(id, vec![name(l - 1, (i + 7) % width), name(0, i)]);
        }
    }
    g
}

fn bench_resolve(c: &mut Criterion) {
    let g = layered(20, 40);
    let opts = ResolveOptions::default();

    c.bench_function("resolve_layered_800", |b| {
        b.iter(|| {
            let res = tier::resolve(black_box(&g), &opts);
            black_box(res.max_tier())
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    let doc = include_str!("../tests/fixtures/elements.html").repeat(50);

    c.bench_function("parse_fixture_x50", |b| {
        b.iter(|| {
            let rows = parse_document(black_box(&doc)).map(|r| r.len()).unwrap_or(0);
            black_box(rows)
        })
    });
}

criterion_group!(benches, bench_resolve, bench_parse);
criterion_main!(benches);
