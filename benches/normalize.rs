use criterion::{black_box, criterion_group, criterion_main, Criterion};

use floating_sticks::input::geometry::{Point, Size};
use floating_sticks::input::normalize::normalize;
use floating_sticks::input::{StickConfig, StickControl};

fn bench_normalize(c: &mut Criterion) {
    let bounds = Size::square(120.0);
    let samples: Vec<Point> = (0..256)
        .map(|i| {
            let t = i as f32 / 256.0 * std::f32::consts::TAU;
            Point::new(60.0 + 90.0 * t.cos(), 60.0 + 90.0 * t.sin())
        })
        .collect();

    c.bench_function("normalize_circle_sweep", |b| {
        b.iter(|| {
            for p in &samples {
                black_box(normalize(black_box(*p), bounds, false));
            }
        })
    });

    c.bench_function("stick_drag", |b| {
        let mut stick = StickControl::new(StickConfig::default());
        b.iter(|| {
            stick.pointer_down(Point::new(60.0, 60.0));
            for p in &samples {
                black_box(stick.pointer_move(*p));
            }
            black_box(stick.pointer_up());
        })
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
