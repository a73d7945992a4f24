//! Fuzz target for the schedule pipeline.
//!
//! Arbitrary delimited text goes through layout inference, validation and
//! rule mapping without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use shiftguard::input::Parser;
use shiftguard::Shiftguard;

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }

    let parser = Parser::new();
    let Ok(table) = parser.parse_bytes(data, b',') else {
        return;
    };

    if let Ok(shiftguard) = Shiftguard::new() {
        let _ = shiftguard.check(&table, &table);
    }
});
