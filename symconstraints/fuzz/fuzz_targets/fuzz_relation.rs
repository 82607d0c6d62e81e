#![no_main]

use libfuzzer_sys::fuzz_target;
use symconstraints::{parse_relation, ResourceLimits, SymbolRegistry};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut registry = SymbolRegistry::new();
        let _ = parse_relation(s, &mut registry, &ResourceLimits::default());
    }
});
