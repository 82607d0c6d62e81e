#![no_main]

use libfuzzer_sys::fuzz_target;
use symconstraints::ConstraintModel;

fuzz_target!(|depth: u8| {
    let depth = (depth as usize % 50) + 1;

    let mut expr = String::from("x");
    for _ in 0..depth {
        expr = format!("({} + 1)", expr);
    }

    let relation = format!("y < {}", expr);
    let _ = ConstraintModel::build(&[relation.as_str(), "y > z"], &[]);
});
