use imgcursor::{
    ArrayImg, CellImg, Dimensions, LocalNeighborhoodCursor, Position, RandomlyPositionable,
    Sampler, SequentialIterable,
};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{distributions::Uniform, Rng, SeedableRng};
use rand_xoshiro::Xoroshiro64Star;

fn sum<C: SequentialIterable + Sampler<Element = f64>>(mut cursor: C) -> f64 {
    let mut sum = 0.0;
    while cursor.has_next() {
        cursor.fwd();
        if let Some(v) = cursor.get() {
            sum += v;
        }
    }
    sum
}

fn neighborhood_sweep<S: RandomlyPositionable + Sampler<Element = f64>>(
    source: S,
    dims: &Dimensions,
) -> f64 {
    let mut center = Position::from([1, 1]);
    let mut neighborhood = LocalNeighborhoodCursor::new(source, &center);
    let mut total = 0.0;
    for y in 1..dims.dim(1) as i64 - 1 {
        for x in 1..dims.dim(0) as i64 - 1 {
            center[0] = x;
            center[1] = y;
            neighborhood.update(&center);
            total += sum(&mut neighborhood);
        }
    }
    total
}

fn criterion_benchmark(c: &mut Criterion) {
    let dims = Dimensions::new(vec![256, 256]).unwrap();
    let cell_dims = Dimensions::new(vec![32, 32]).unwrap();

    let mut rng = Xoroshiro64Star::seed_from_u64(42);
    let pixels = Uniform::new(0.0, 1.0);
    let data: Vec<f64> = (0..dims.size()).map(|_| rng.sample(pixels)).collect();

    let flat = ArrayImg::new(dims.clone(), data.clone()).unwrap();
    let chunked = CellImg::from_fn(dims.clone(), cell_dims, |p| {
        data[usize::from(dims.position_to_index(p))]
    })
    .unwrap();

    let mut group = c.benchmark_group("raster_scan");

    group.bench_function("array_cursor", |b| b.iter(|| sum(black_box(&flat).cursor())));
    group.bench_function("array_random_access", |b| {
        b.iter(|| sum(black_box(&flat).random_access()))
    });
    group.bench_function("cell_cursor", |b| b.iter(|| sum(black_box(&chunked).cursor())));
    group.finish();

    let mut group = c.benchmark_group("neighborhood");
    group.sample_size(20);
    group.bench_function("array", |b| {
        b.iter(|| neighborhood_sweep(black_box(&flat).random_access(), &dims))
    });
    group.bench_function("cell", |b| {
        b.iter(|| neighborhood_sweep(black_box(&chunked).random_access(), &dims))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
