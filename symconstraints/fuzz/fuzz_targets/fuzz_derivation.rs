#![no_main]

use libfuzzer_sys::fuzz_target;
use symconstraints::{ModelBuilder, ResourceLimits};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let limits = ResourceLimits::default()
            .with_max_eliminations(1_000)
            .with_max_derived_constraints(32);
        let mut builder = ModelBuilder::new().limits(limits);
        for line in s.lines().take(4) {
            if builder.relation(line).is_err() {
                return;
            }
        }
        let _ = builder.build();
    }
});
