//! Benchmarks for buffer editing and line rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quill::editor::{Direction, EditorBuffer};
use quill::ui::visible_line;

fn sample_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {i}\tsome text with words and a few more words"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_typing(c: &mut Criterion) {
    let text = sample_text(5_000);
    c.bench_function("type_1000_chars_mid_document", |b| {
        b.iter(|| {
            let mut buffer = EditorBuffer::from_text(&text);
            buffer.move_to(2_500, 10);
            for _ in 0..1_000 {
                buffer.insert_char(black_box('x'));
            }
            buffer
        });
    });
}

fn bench_navigation(c: &mut Criterion) {
    let mut buffer = EditorBuffer::from_text(&sample_text(5_000));
    c.bench_function("move_down_through_document", |b| {
        b.iter(|| {
            buffer.move_to_start();
            for _ in 0..5_000 {
                buffer.move_cursor(black_box(Direction::Down));
            }
        });
    });
}

fn bench_visible_line(c: &mut Criterion) {
    let line = "\tlet value = compute(alpha, beta, gamma); // 日本語 comment".repeat(4);
    c.bench_function("visible_line_with_selection", |b| {
        b.iter(|| visible_line(black_box(&line), 4, 8, 120, Some(10..60)));
    });
}

criterion_group!(benches, bench_typing, bench_navigation, bench_visible_line);
criterion_main!(benches);
