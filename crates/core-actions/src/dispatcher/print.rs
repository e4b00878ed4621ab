use std::io::Write;

use anyhow::Result;
use core_state::EditEngine;

use super::{DispatchResult, engine_line};

/// Write positions `from..=to`, one per line; missing positions get `placeholder`.
pub(crate) fn handle_print<W: Write>(
    engine: &mut EditEngine,
    from: isize,
    to: isize,
    output: &mut W,
    placeholder: &[u8],
) -> Result<DispatchResult> {
    let mut printed = 0usize;
    // Negative positions never hold a line; the engine starts counting at 0.
    let mut position = from;
    while position < 0 && position <= to {
        output.write_all(placeholder)?;
        output.write_all(b"\n")?;
        printed += 1;
        position += 1;
    }
    if position <= to {
        for line in engine.print(engine_line(position), engine_line(to)) {
            output.write_all(line.unwrap_or(placeholder))?;
            output.write_all(b"\n")?;
            printed += 1;
        }
    } else {
        engine.resolve_pending();
    }
    tracing::trace!(target: "actions.dispatch", op = "print", from, to, printed, "print");
    Ok(DispatchResult::printed(printed))
}
