use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_sim::core::{Board, Engine};
use tetris_sim::types::{Action, LearningMode, PieceKind};

fn bench_step(c: &mut Criterion) {
    let mut engine = Engine::default();
    engine.reset(12345, LearningMode::Training);

    c.bench_function("step_noop", |b| {
        b.iter(|| {
            if engine.is_terminal() {
                engine.reset(12345, LearningMode::Training);
            }
            engine.step(black_box(Action::NoOp)).unwrap();
        })
    });
}

fn bench_random_rollout(c: &mut Criterion) {
    c.bench_function("rollout_1000_steps", |b| {
        b.iter(|| {
            let mut engine = Engine::default();
            engine.reset(black_box(7), LearningMode::Validation);
            for i in 0..1000u64 {
                if engine.is_terminal() {
                    break;
                }
                engine.step_id((i * 7 + i / 3) % 5).unwrap();
            }
            engine.score()
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::default();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, PieceKind::I.tag());
                }
            }
            board.clear_full_rows()
        })
    });
}

fn bench_reset(c: &mut Criterion) {
    let mut engine = Engine::default();
    let mut seed = 0u64;

    c.bench_function("reset", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            engine.reset(black_box(seed), LearningMode::Training);
        })
    });
}

fn bench_clone(c: &mut Criterion) {
    let mut engine = Engine::default();
    engine.reset(99, LearningMode::Training);
    for _ in 0..50 {
        engine.step(Action::SoftDrop).unwrap();
    }

    c.bench_function("clone_engine", |b| b.iter(|| black_box(&engine).clone()));
}

criterion_group!(
    benches,
    bench_step,
    bench_random_rollout,
    bench_line_clear,
    bench_reset,
    bench_clone
);
criterion_main!(benches);
