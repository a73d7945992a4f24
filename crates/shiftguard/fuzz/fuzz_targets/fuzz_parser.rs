//! Fuzz target for the sheet loader.
//!
//! The loader must never panic on malformed delimited or JSON input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use shiftguard::input::Parser;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    for suffix in [".csv", ".json"] {
        if let Ok(mut temp_file) = tempfile::Builder::new().suffix(suffix).tempfile() {
            if temp_file.write_all(data).is_ok() {
                let _ = Parser::new().parse_file(temp_file.path());
            }
        }
    }
});
