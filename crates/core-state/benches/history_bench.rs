use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use core_state::{EditEngine, GrowthPolicy, lines_from};
use std::hint::black_box;

const DOC_LINES: usize = 10_000;
const EDITS: usize = 2_000;

/// Large document followed by a long run of single-line edits spread across it.
fn build() -> EditEngine {
    let mut engine = EditEngine::with_policy(GrowthPolicy::new(EDITS + 1, 1_000)).unwrap();
    let body: Vec<String> = (0..DOC_LINES).map(|i| format!("line {i}")).collect();
    engine
        .replace(1, DOC_LINES, &mut lines_from(&body))
        .unwrap();
    for i in 0..EDITS {
        let at = (i * 37) % DOC_LINES + 1;
        if i % 3 == 0 {
            engine.delete(at, at).unwrap();
        } else {
            let text = format!("edit {i}");
            engine
                .replace(at, at, &mut lines_from([text.as_str()]))
                .unwrap();
        }
    }
    engine
}

fn bench_batched_undo_redo(c: &mut Criterion) {
    c.bench_function("undo_redo_batch_100", |b| {
        b.iter_batched(
            build,
            |mut engine| {
                engine.queue_undo(100);
                engine.finish();
                engine.queue_redo(100);
                engine.finish();
                black_box(engine.line_count())
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("undo_all_then_print", |b| {
        b.iter_batched(
            build,
            |mut engine| {
                engine.queue_undo(EDITS);
                black_box(engine.print(1, 20).count())
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_batched_undo_redo);
criterion_main!(benches);
