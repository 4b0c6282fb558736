//! Fuzz target for A1 address parsing.
//!
//! Any address that parses must format back to text that parses to the
//! same address.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetlabel::RangeAddress;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 64 {
        return;
    }

    if let Ok(range) = RangeAddress::from_a1(text) {
        let again = RangeAddress::from_a1(&range.to_a1()).expect("formatted address parses");
        assert_eq!(range, again);
        let _ = RangeAddress::from_region(&range.region());
    }
});
