//! Fuzz target for datatype glob compilation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lhcbdata::options::{compile_glob, glob_matches};

fuzz_target!(|data: &[u8]| {
    let Ok(pattern) = std::str::from_utf8(data) else {
        return;
    };
    if pattern.len() > 4096 {
        return;
    }

    if let Ok(compiled) = compile_glob(pattern) {
        let _ = glob_matches(&compiled, pattern);
    }
});
