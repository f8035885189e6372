#![no_main]

use libfuzzer_sys::fuzz_target;
use slither::{CompileOptions, compile};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Imports fail without a loader; everything else must not panic.
        let _ = compile(s, &CompileOptions::default().with_beautify(true));
    }
});
