use chrono::{Duration, NaiveDate};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tcal::model::Record;
use tcal::table::{compute_layout, compute_visible, wrap};
use tcal::view::agenda::AGENDA_SCHEMA;
use tcal::view::build_table_frame;

fn make_records(count: usize) -> Vec<Record> {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap();
    let words = ["ship", "review", "draft", "plan", "write", "call", "fix", "sketch"];
    (0..count)
        .map(|i| {
            let outcome: Vec<&str> = (0..(i % 24) + 1).map(|w| words[(i + w) % words.len()]).collect();
            Record::new(
                start + Duration::minutes(i as i64 * 97),
                outcome.join(" "),
                format!("impact {i}\nsecond line for {i}"),
            )
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let records = make_records(500);
    let samples = AGENDA_SCHEMA.sample_rows(records.iter());

    c.bench_function("compute_layout (500 rows, 120 cols)", |b| {
        b.iter(|| compute_layout(AGENDA_SCHEMA.columns, black_box(&samples), black_box(120)))
    });
    c.bench_function("compute_layout (500 rows, 30 cols)", |b| {
        b.iter(|| compute_layout(AGENDA_SCHEMA.columns, black_box(&samples), black_box(30)))
    });
}

fn bench_wrap(c: &mut Criterion) {
    let text = "the quick brown fox jumps over the lazy dog ".repeat(40);

    c.bench_function("wrap (1.7k chars, width 40)", |b| {
        b.iter(|| wrap(black_box(&text), black_box(40)))
    });
}

fn bench_viewport(c: &mut Criterion) {
    let heights: Vec<usize> = (0..10_000).map(|i| 1 + i % 4).collect();

    c.bench_function("compute_visible (10k rows, jump to end)", |b| {
        b.iter(|| compute_visible(black_box(&heights), 9_999, 0, black_box(40)))
    });
}

fn bench_frame(c: &mut Criterion) {
    let records = make_records(2_000);
    let refs: Vec<&Record> = records.iter().collect();

    c.bench_function("build_table_frame (2k records, expanded)", |b| {
        b.iter(|| build_table_frame(black_box(&refs), &AGENDA_SCHEMA, 120, 40, 1_000, 0, |_| true))
    });
}

criterion_group!(benches, bench_layout, bench_wrap, bench_viewport, bench_frame);
criterion_main!(benches);
