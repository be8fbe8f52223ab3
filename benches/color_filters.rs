// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use photo_edit::domain::editing::{Brightness, Contrast};
use photo_edit::media::{color, BrightnessMode, FilterKind, RasterImage};
use std::hint::black_box;

fn color_filters_benchmark(c: &mut Criterion) {
    let image = RasterImage::filled(1024, 768, [200, 150, 100, 255]);

    let mut group = c.benchmark_group("color_filters");
    for kind in [FilterKind::Grayscale, FilterKind::Sepia, FilterKind::Vintage] {
        group.bench_with_input(BenchmarkId::new("filter", kind), &kind, |b, kind| {
            b.iter(|| black_box(kind.apply(&image)));
        });
    }

    for mode in [BrightnessMode::Linear, BrightnessMode::Extreme] {
        group.bench_with_input(
            BenchmarkId::new("adjust", format!("{mode:?}")),
            &mode,
            |b, mode| {
                b.iter(|| {
                    black_box(color::adjust(
                        &image,
                        Brightness::new(40),
                        Contrast::new(20),
                        *mode,
                    ))
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, color_filters_benchmark);
criterion_main!(benches);
