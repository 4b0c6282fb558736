#![allow(dead_code)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use sheetlabel::region::{LabelMatrix, LabeledCell};
use sheetlabel::tree::io_ranges_csv::RangeRecord;
use sheetlabel::tree::RangeStats;
use sheetlabel::{Interval1D, Interval2D, Label, RangeAddress};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Intervals with integer endpoints, so lengths and gaps are exact.
pub fn arb_interval1d() -> BoxedStrategy<Interval1D> {
    (-1000i32..1000, 0i32..200)
        .prop_map(|(min, len)| {
            Interval1D::new(min as f64, (min + len) as f64).expect("ordered endpoints")
        })
        .boxed()
}

pub fn arb_interval2d() -> BoxedStrategy<Interval2D> {
    (arb_interval1d(), arb_interval1d())
        .prop_map(|(x, y)| Interval2D::new(x, y))
        .boxed()
}

pub fn arb_label() -> BoxedStrategy<Label> {
    prop::sample::select(Label::ALL.to_vec()).boxed()
}

/// Any label a range may carry.
pub fn arb_range_label() -> BoxedStrategy<Label> {
    let labels: Vec<Label> = Label::ALL
        .iter()
        .copied()
        .filter(|l| *l != Label::Table)
        .collect();
    prop::sample::select(labels).boxed()
}

pub fn arb_range_address() -> BoxedStrategy<RangeAddress> {
    (0u32..60, 0u32..500, 0u32..12, 0u32..40)
        .prop_map(|(column, row, width, height)| {
            RangeAddress::from_bounds(column, row, column + width, row + height)
        })
        .boxed()
}

pub fn arb_stats() -> BoxedStrategy<RangeStats> {
    (
        proptest::option::of(0u64..100_000),
        proptest::option::of(0u64..100_000),
        proptest::option::of(0u64..100_000),
        proptest::option::of(0u64..100_000),
        proptest::option::of(any::<bool>()),
        proptest::option::of(1u32..10_000),
        proptest::option::of(1u32..100),
    )
        .prop_map(
            |(total, empty, constant, formula, merged, rows, columns)| RangeStats {
                total_cells: total,
                empty_cells: empty,
                constant_cells: constant,
                formula_cells: formula,
                has_merged_cells: merged,
                rows,
                columns,
            },
        )
        .boxed()
}

/// A label grid where `None` marks an unlabeled cell. Each cell carries its
/// own matrix position.
pub fn arb_label_matrix(max_rows: usize, max_columns: usize) -> BoxedStrategy<LabelMatrix> {
    proptest::collection::vec(
        proptest::collection::vec(proptest::option::of(arb_label()), 0..=max_columns),
        0..=max_rows,
    )
    .prop_map(|grid| {
        let rows = grid
            .into_iter()
            .enumerate()
            .map(|(r, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(c, label)| label.map(|l| LabeledCell::new(l, r as u32, c as u32)))
                    .collect()
            })
            .collect();
        LabelMatrix::new(rows)
    })
    .boxed()
}

#[derive(Clone, Debug)]
struct RangeSeed {
    label: Label,
    address: RangeAddress,
    stats: RangeStats,
    /// Picks the parent: the sheet, or one of its tables.
    parent_pick: usize,
}

fn range_seed_strategy() -> BoxedStrategy<RangeSeed> {
    (arb_range_label(), arb_range_address(), arb_stats(), 0usize..8)
        .prop_map(|(label, address, stats, parent_pick)| RangeSeed {
            label,
            address,
            stats,
            parent_pick,
        })
        .boxed()
}

/// Interchange rows describing a consistent tree, parents before children.
pub fn arb_records(
    max_sheets: usize,
    max_tables: usize,
    max_ranges: usize,
) -> BoxedStrategy<Vec<RangeRecord>> {
    assert!(max_sheets > 0, "max_sheets must be > 0");

    proptest::collection::vec(
        (
            proptest::collection::vec((arb_range_address(), arb_stats()), 0..=max_tables),
            proptest::collection::vec(range_seed_strategy(), 0..=max_ranges),
        ),
        1..=max_sheets,
    )
    .prop_map(build_records)
    .boxed()
}

type SheetSeed = (Vec<(RangeAddress, RangeStats)>, Vec<RangeSeed>);

fn build_records(sheets: Vec<SheetSeed>) -> Vec<RangeRecord> {
    let mut out = Vec::new();
    for (s, (tables, ranges)) in sheets.into_iter().enumerate() {
        let sheet_name = format!("Sheet{}", s + 1);
        let table_names: Vec<String> = (0..tables.len())
            .map(|t| format!("Table{}_{}", s + 1, t + 1))
            .collect();

        for ((address, stats), name) in tables.into_iter().zip(&table_names) {
            out.push(RangeRecord {
                sheet_name: sheet_name.clone(),
                sheet_index: s as u32,
                label: Label::Table,
                name: name.clone(),
                address,
                parent: sheet_name.clone(),
                stats,
            });
        }
        for (r, seed) in ranges.into_iter().enumerate() {
            // One pick in (tables + 1) lands on the sheet itself.
            let parent = match seed.parent_pick % (table_names.len() + 1) {
                0 => sheet_name.clone(),
                i => table_names[i - 1].clone(),
            };
            out.push(RangeRecord {
                sheet_name: sheet_name.clone(),
                sheet_index: s as u32,
                label: seed.label,
                name: format!("Range{}_{}", s + 1, r + 1),
                address: seed.address,
                parent,
                stats: seed.stats,
            });
        }
    }
    out
}

/// Rows keyed by (sheet, name), for order-insensitive comparison.
pub fn records_by_key(records: &[RangeRecord]) -> BTreeMap<(String, String), RangeRecord> {
    records
        .iter()
        .map(|r| ((r.sheet_name.clone(), r.name.clone()), r.clone()))
        .collect()
}
