#![no_main]

use libfuzzer_sys::fuzz_target;
use symconstraints::{Assignment, ConstraintModel};

fuzz_target!(|values: (i64, i64, i64, u8)| {
    let Ok(model) = ConstraintModel::build(&["area = width * height", "height > width", "c > b**2 + 1"], &[])
    else {
        return;
    };

    let (area, width, height, present) = values;
    let mut row = Assignment::new();
    for (bit, (name, value)) in [("area", area), ("width", width), ("height", height)]
        .into_iter()
        .enumerate()
    {
        row.set(name, (present & (1 << bit) != 0).then(|| value.into()));
    }
    let _ = model.check(&row);
    let _ = model.impute(&row);
});
