#![no_main]

use libfuzzer_sys::fuzz_target;
use slither::frontend::{lexer, parser};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        if lexer::lex(s).is_ok() {
            let _ = parser::parse(s, &parser::ParseOptions::default());
        }
    }
});
