//! Bundle text emission.

use crate::wrap::WrappedUnit;

/// Join wrapped units with `\n` in order, then append `trailer` verbatim.
pub fn emit(units: &[WrappedUnit], trailer: &str) -> String {
    let capacity = units.iter().map(|unit| unit.code.len() + 1).sum::<usize>() + trailer.len();
    let mut out = String::with_capacity(capacity);

    for (index, unit) in units.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&unit.code);
    }
    out.push_str(trailer);
    out
}
