//! Fuzz target for cell label CSV parsing and row grouping.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetlabel::region::io_cells_csv::from_cell_labels_csv_str;
use sheetlabel::region::{group_row_intervals, stack_row_regions, IndexMode, LabelMatrix};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 64 * 1024 {
        return;
    }

    let Ok(cells) = from_cell_labels_csv_str(text) else {
        return;
    };
    // Wide sheets would only exercise the allocator.
    if cells.iter().any(|c| c.column > 1024) {
        return;
    }
    let Ok(matrix) = LabelMatrix::from_cells(cells) else {
        return;
    };
    if let Ok(rows) = group_row_intervals(&matrix, IndexMode::Original) {
        let _ = stack_row_regions(&rows);
    }
});
