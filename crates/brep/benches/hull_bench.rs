//! Criterion microbenches for hull construction.
//!
//! - incremental 3D hull over sphere and box clouds,
//! - Graham scan over planar clouds.

use brep::api::{convex_hull_2d, draw_points, BBox3, CloudShape, Polyhedron, ReplayToken};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::vector;

fn bench_hull_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull3d");
    for &n in &[50usize, 200, 800] {
        group.bench_function(BenchmarkId::new("sphere", n), |b| {
            b.iter_batched(
                || ReplayToken::new(42, 0),
                |mut tok| {
                    tok.index = tok.index.wrapping_add(1);
                    let points = draw_points(
                        CloudShape::OnSphere {
                            center: vector![0.0, 0.0, 0.0],
                            radius: 10.0,
                        },
                        n,
                        tok,
                    );
                    Polyhedron::from_points(&points)
                },
                BatchSize::SmallInput,
            )
        });
    }
    let cube = BBox3::new(vector![-1.0, -1.0, -1.0], vector![1.0, 1.0, 1.0]);
    group.bench_function(BenchmarkId::new("box", 500), |b| {
        b.iter_batched(
            || draw_points(CloudShape::InBox(cube), 500, ReplayToken::new(7, 3)),
            |points| Polyhedron::from_points(&points),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_hull_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull2d");
    for &n in &[100usize, 1000] {
        let points = draw_points(
            CloudShape::OnPlane {
                center: vector![1.0, 2.0, 3.0],
                normal: vector![0.2, -0.3, 1.0],
                radius: 4.0,
            },
            n,
            ReplayToken::new(9, n as u64),
        );
        group.bench_function(BenchmarkId::new("graham", n), |b| {
            b.iter(|| convex_hull_2d(&points))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hull_3d, bench_hull_2d);
criterion_main!(benches);
