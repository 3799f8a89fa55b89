use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dms::{CalibrationProfile, DmsModule};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{face_frame, hand_at, hand_at_ear, FaceBuilder};

fn bench_face_only(c: &mut Criterion) {
    let mut module = DmsModule::default();
    module.calibrate(CalibrationProfile::default());
    let mut frame = face_frame(FaceBuilder::new().build(), 0);

    c.bench_function("process_frame_face_only", |b| {
        b.iter(|| {
            frame.timestamp_ms += 33;
            black_box(module.process_frame(black_box(&frame)));
        })
    });
}

fn bench_face_and_hands(c: &mut Criterion) {
    let mut module = DmsModule::default();
    module.calibrate(CalibrationProfile::default());
    let mut frame = face_frame(FaceBuilder::new().head(0.65, 0.6).ear(0.05).build(), 0)
        .with_hand(hand_at_ear())
        .with_hand(hand_at(0.6, 0.85));

    c.bench_function("process_frame_face_and_hands", |b| {
        b.iter(|| {
            frame.timestamp_ms += 33;
            black_box(module.process_frame(black_box(&frame)));
        })
    });
}

criterion_group!(benches, bench_face_only, bench_face_and_hands);
criterion_main!(benches);
