use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use label_tiler_core::{ImageSize, LabelBox, TileSize, Tiler, TilerParams};

/// Deterministic scatter of `n` small boxes over the unit square.
fn scattered_boxes(n: usize) -> Vec<LabelBox> {
    let mut state: u32 = 0x9e37_79b9;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state % 10_000) as f32 / 10_000.0
    };
    (0..n)
        .map(|i| {
            let size = 0.01 + next() * 0.05;
            LabelBox::new((i % 8) as i32, next(), next(), size, size)
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let image = ImageSize::new(4000, 3000);
    let tiler = Tiler::new(TilerParams::new(TileSize::new(640, 640)));

    let mut group = c.benchmark_group("plan_tiles");
    for n in [16usize, 128, 512] {
        let boxes = scattered_boxes(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &boxes, |b, boxes| {
            b.iter(|| tiler.plan(black_box(boxes), image))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
