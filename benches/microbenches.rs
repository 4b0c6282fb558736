//! Criterion microbenches for sheetlabel grouping and interchange parsing.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Ranges CSV parsing into a workbook (from_ranges_csv_str)
//! - Ranges CSV writing (to_ranges_csv_string)
//! - Row grouping and vertical stacking of a labeled grid

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use sheetlabel::region::{
    group_row_intervals, stack_row_regions, IndexMode, LabelMatrix, LabeledCell,
};
use sheetlabel::tree::io_ranges_csv::{from_ranges_csv_str, to_ranges_csv_string};
use sheetlabel::tree::Layout;
use sheetlabel::Label;

// Include test fixtures at compile time (no file I/O during benchmark)
const RANGES_FIXTURE: &str = include_str!("../tests/fixtures/ranges_valid.csv");

/// A 200 x 30 grid: a header row, then data blocks separated by note rows.
fn label_grid() -> LabelMatrix {
    let rows = (0u32..200)
        .map(|r| {
            (0u32..30)
                .map(|c| {
                    let label = match (r, c) {
                        (0, _) => Label::Header,
                        (_, 0) => Label::Attributes,
                        (r, _) if r % 25 == 0 => Label::Notes,
                        (_, c) if c % 7 == 6 => return None,
                        _ => Label::Data,
                    };
                    Some(LabeledCell::new(label, r, c))
                })
                .collect()
        })
        .collect();
    LabelMatrix::new(rows)
}

/// Benchmark ranges CSV parsing and tree reconstruction.
fn bench_ranges_parse(c: &mut Criterion) {
    let layout = Layout::default();
    let mut group = c.benchmark_group("ranges_csv");
    group.throughput(Throughput::Bytes(RANGES_FIXTURE.len() as u64));

    group.bench_function("from_ranges_csv_str", |b| {
        b.iter(|| {
            let book = from_ranges_csv_str(black_box(RANGES_FIXTURE), &layout, "bench").unwrap();
            black_box(book)
        })
    });

    group.finish();
}

/// Benchmark ranges CSV writing.
///
/// We parse the fixture once to get a Workbook, then benchmark only the
/// writing step.
fn bench_ranges_write(c: &mut Criterion) {
    let layout = Layout::default();
    let book = from_ranges_csv_str(RANGES_FIXTURE, &layout, "bench").unwrap();

    let mut group = c.benchmark_group("ranges_csv");
    group.bench_function("to_ranges_csv_string", |b| {
        b.iter(|| {
            let csv = to_ranges_csv_string(black_box(&book), &layout).unwrap();
            black_box(csv)
        })
    });

    group.finish();
}

/// Benchmark row grouping, with and without stacking.
fn bench_grouping(c: &mut Criterion) {
    let matrix = label_grid();
    let mut group = c.benchmark_group("grouping");
    group.throughput(Throughput::Elements(6000));

    group.bench_function("group_row_intervals", |b| {
        b.iter(|| {
            let rows = group_row_intervals(black_box(&matrix), IndexMode::Dense).unwrap();
            black_box(rows)
        })
    });

    let rows = group_row_intervals(&matrix, IndexMode::Dense).unwrap();
    group.bench_function("stack_row_regions", |b| {
        b.iter(|| black_box(stack_row_regions(black_box(&rows))))
    });

    group.finish();
}

criterion_group!(benches, bench_ranges_parse, bench_ranges_write, bench_grouping);
criterion_main!(benches);
