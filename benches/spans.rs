use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feature_spans::prelude::*;

fn random_weights(n: usize, seed: u64) -> FeatureWeights {
    // Simple LCG for reproducible "random" weights
    let mut x = seed;
    FeatureWeights::from_weights((0..n).map(|i| {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        let w = (x as f64 / u64::MAX as f64) * 2.0 - 1.0;
        FeatureWeight::new(format!("tok{i}"), w)
    }))
}

fn token_table(n_tokens: usize, vocab: usize) -> Precomputed {
    let mut doc = String::new();
    let mut found = Vec::with_capacity(n_tokens);
    for i in 0..n_tokens {
        let name = format!("tok{}", (i * 7919) % vocab);
        let start = doc.len();
        doc.push_str(&name);
        found.push((vec![Span::new(start, doc.len())], name));
        doc.push(' ');
    }
    Precomputed::new(doc, found)
}

fn bench_align(c: &mut Criterion) {
    let mut g = c.benchmark_group("align");

    for &n_weights in &[20, 200, 2000] {
        let weights = random_weights(n_weights, 1);
        let analyzer = token_table(500, 1000);

        g.bench_with_input(BenchmarkId::new("single", n_weights), &n_weights, |bench, _| {
            bench.iter(|| black_box(align("", &weights, &analyzer, None)));
        });
    }

    g.finish();
}

fn bench_explain(c: &mut Criterion) {
    let mut g = c.benchmark_group("explain");

    let weights = random_weights(500, 7);
    let single = Vectorizer::single(token_table(500, 1000));
    g.bench_function("single_500x500", |bench| {
        bench.iter(|| black_box(explain_spans("", &single, &weights)));
    });

    let prefixed = FeatureWeights::from_weights(
        weights
            .keyed()
            .enumerate()
            .map(|(i, (_, fw))| {
                let source = if i % 2 == 0 { "w" } else { "c" };
                FeatureWeight::new(format!("{source}__{}", fw.feature), fw.weight)
            }),
    );
    let union = Vectorizer::union([
        FeatureSource::new("w", token_table(500, 1000)),
        FeatureSource::new("c", token_table(2000, 1000)),
    ]);
    g.bench_function("union_500x2500", |bench| {
        bench.iter(|| black_box(explain_spans("", &union, &prefixed)));
    });

    g.finish();
}

criterion_group!(benches, bench_align, bench_explain);
criterion_main!(benches);
