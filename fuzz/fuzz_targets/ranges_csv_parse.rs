//! Fuzz target for ranges interchange CSV parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the ranges CSV reader and
//! tree reconstruction, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetlabel::tree::io_ranges_csv::from_ranges_csv_slice;
use sheetlabel::tree::Layout;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_ranges_csv_slice(data, &Layout::default(), "fuzz");
});
