// Criterion benchmarks for Lume Deck

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lume_deck::core::{badge_opacities, decide, drag_transform, DeckEngine};
use lume_deck::models::{Decision, DeckTuning, DragOffset, Profile};

fn create_profiles(count: usize) -> Vec<Profile> {
    (0..count)
        .map(|id| {
            Profile::new(id.to_string(), format!("User {}", id), 21 + (id % 15) as u32)
                .with_photos((0..4).map(|i| format!("https://cdn.lume.test/{}/{}.jpg", id, i)))
        })
        .collect()
}

fn bench_gesture_math(c: &mut Criterion) {
    let tuning = DeckTuning::default();

    c.bench_function("drag_frame", |b| {
        b.iter(|| {
            let offset = black_box(DragOffset::new(87.5, -42.0));
            (
                drag_transform(offset, &tuning),
                badge_opacities(offset, &tuning),
                decide(offset, tuning.decision_threshold),
            )
        });
    });
}

fn bench_drag_session(c: &mut Criterion) {
    c.bench_function("drag_60_moves_and_release", |b| {
        b.iter_with_setup(
            || {
                let mut engine = DeckEngine::with_default_tuning();
                engine.initialize(create_profiles(3));
                engine
            },
            |mut engine| {
                engine.begin_drag(1, 0.0, 0.0);
                for step in 0..60 {
                    engine.update_drag(step as f64 * 3.0, step as f64 * -0.5);
                }
                black_box(engine.end_drag())
            },
        );
    });
}

fn bench_commit_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide_until_empty");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter_with_setup(
                || {
                    let mut engine = DeckEngine::with_default_tuning();
                    engine.initialize(create_profiles(size));
                    engine
                },
                |mut engine| {
                    while engine.decide_explicit(Decision::Nope) {
                        engine.take_scheduled();
                        engine.take_cancelled();
                        engine.take_decisions();
                    }
                    black_box(engine.render())
                },
            );
        });
    }

    group.finish();
}

fn bench_load_more(c: &mut Criterion) {
    c.bench_function("load_more_100_into_100", |b| {
        b.iter_with_setup(
            || {
                let mut engine = DeckEngine::with_default_tuning();
                engine.initialize(create_profiles(100));
                (engine, create_profiles(200).split_off(100))
            },
            |(mut engine, fresh)| black_box(engine.load_more(fresh)),
        );
    });
}

criterion_group!(
    benches,
    bench_gesture_math,
    bench_drag_session,
    bench_commit_throughput,
    bench_load_more
);
criterion_main!(benches);
