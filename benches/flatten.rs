// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use photo_edit::config::Config;
use photo_edit::editor::EditSession;
use photo_edit::media::RasterImage;
use photo_edit::overlay::{StickerId, TextStyle};
use std::hint::black_box;

fn session_with_layers() -> EditSession {
    let image = RasterImage::filled(2000, 1500, [90, 120, 160, 255]);
    let mut session = EditSession::with_config(image, &Config::default());
    for sticker in [StickerId::Heart, StickerId::Star, StickerId::Sun] {
        session.add_sticker_layer(sticker).unwrap();
    }
    session
        .add_text_layer("Weekend trip", TextStyle::default())
        .unwrap();
    session
}

fn flatten_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    group.sample_size(20);

    let session = session_with_layers();
    group.bench_function("flatten_2000x1500_four_layers", |b| {
        b.iter(|| black_box(session.flatten().unwrap()));
    });

    group.bench_function("encode_jpeg_2000x1500", |b| {
        let job = session.export_job();
        b.iter(|| black_box(job.encode(&Default::default()).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, flatten_benchmark);
criterion_main!(benches);
