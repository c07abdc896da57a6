//! Fuzz target for `lfn:`/`pfn:` specifier parsing.
//!
//! A parsed file must render back to a name with the same prefix.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lhcbdata::dataset::parse_data_file;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(file) = parse_data_file(text) {
        let full = file.full_name();
        assert!(full.starts_with("LFN:") || full.starts_with("PFN:"));
        assert_eq!(&full[4..], file.name());
    }
});
