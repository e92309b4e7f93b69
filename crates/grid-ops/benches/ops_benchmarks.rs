//! Benchmarks for the grid operations hot paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use grid_common::{Axis, Geometry, LabeledArray, NoData};
use grid_ops::{classify, rasterize, trim, Classifier, Rule};

fn random_grid(len_x: usize, len_y: usize, missing_fraction: f64) -> LabeledArray<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<f64> = (0..len_x * len_y)
        .map(|_| {
            if rng.gen::<f64>() < missing_fraction {
                -9999.0
            } else {
                rng.gen_range(0.0..100.0)
            }
        })
        .collect();
    LabeledArray::new(
        data,
        vec![
            Axis::regular("x", 0.0, 1.0, len_x),
            Axis::regular("y", 0.0, 1.0, len_y),
        ],
        Some(NoData::Value(-9999.0)),
    )
    .expect("shape matches by construction")
}

fn bench_rasterize(c: &mut Criterion) {
    let x = Axis::regular("x", 0.0, 1.0, 256);
    let y = Axis::regular("y", 0.0, 1.0, 256);
    // irregular pentagon covering roughly the middle of the grid
    let polygon = Geometry::polygon(vec![
        [40.0, 30.0],
        [220.0, 50.0],
        [200.0, 210.0],
        [120.0, 240.0],
        [30.0, 150.0],
    ]);

    c.bench_function("rasterize_polygon_256x256", |b| {
        b.iter(|| rasterize(black_box(&x), black_box(&y), black_box(&polygon)))
    });

    let line = Geometry::line(vec![[0.0, 0.0], [128.0, 200.0], [255.0, 64.0]]);
    c.bench_function("rasterize_line_256x256", |b| {
        b.iter(|| rasterize(black_box(&x), black_box(&y), black_box(&line)))
    });
}

fn bench_trim(c: &mut Criterion) {
    let grid = random_grid(512, 512, 0.7);
    c.bench_function("trim_512x512", |b| {
        b.iter(|| trim(black_box(&grid), &["x", "y"], 0))
    });
}

fn bench_classify(c: &mut Criterion) {
    let grid = random_grid(512, 512, 0.1);
    let classifier = Classifier::new(vec![
        Rule::range(0.0, 25.0, 1.0),
        Rule::range(25.0, 50.0, 2.0),
        Rule::range(50.0, 75.0, 3.0),
        Rule::range(75.0, 100.0, 4.0),
    ]);

    c.bench_function("classify_512x512", |b| {
        b.iter(|| classify(black_box(&grid), black_box(&classifier)))
    });
}

criterion_group!(benches, bench_rasterize, bench_trim, bench_classify);
criterion_main!(benches);
