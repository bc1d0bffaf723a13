use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use cyclable_core::{
    reconstruct::reconstruct_segments,
    ride::{DEFAULT_COORDINATE_SCALE, Ride, TableRow},
    tags::Tags,
};

/// A ride of `points` coordinates with a table row every `step` coordinates.
fn long_ride(points: i64, step: i64) -> Ride {
    let scaled: Vec<[i64; 2]> = (0..points)
        .map(|i| [-1_680_000 + i * 7, 48_110_000 + i * 3])
        .collect();

    let geometry = scaled
        .iter()
        .map(|c| {
            [
                c[0] as f64 / DEFAULT_COORDINATE_SCALE,
                c[1] as f64 / DEFAULT_COORDINATE_SCALE,
            ]
        })
        .collect();

    let table = scaled
        .iter()
        .skip(step as usize)
        .step_by(step as usize)
        .enumerate()
        .map(|(i, c)| TableRow {
            boundary_lon: c[0],
            boundary_lat: c[1],
            elevation: 40.0,
            distance: 25.0,
            tags: Tags::parse(if i % 2 == 0 {
                "highway=cycleway surface=asphalt"
            } else {
                "highway=residential"
            }),
        })
        .collect();

    Ride {
        geometry,
        table,
        from_point: "a".to_string(),
        to_point: "b".to_string(),
        backbone_ride: false,
    }
}

fn reconstruct_benchmark(c: &mut Criterion) {
    let ride = long_ride(20_000, 20);

    c.bench_function("reconstruct_segments (20k coordinates)", |b| {
        b.iter(|| reconstruct_segments(black_box(&ride), DEFAULT_COORDINATE_SCALE))
    });
}

criterion_group!(benches, reconstruct_benchmark);
criterion_main!(benches);
