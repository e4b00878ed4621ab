//! Text mutation: change (replace a range with a block of input lines) and
//! delete. Both become new history entries; any redo tail is discarded by the
//! engine before the edit is applied.

use std::io::BufRead;

use anyhow::{Context, Result};
use core_state::EditEngine;

use super::{DispatchResult, engine_line};
use crate::io_ops::ReplacementLines;

pub(crate) fn handle_change<R: BufRead>(
    engine: &mut EditEngine,
    from: isize,
    to: isize,
    input: &mut R,
    max_line_bytes: usize,
) -> Result<DispatchResult> {
    let mut lines = ReplacementLines::new(input, max_line_bytes);
    engine
        .replace(engine_line(from), engine_line(to), &mut lines)
        .with_context(|| format!("change {from},{to}"))?;
    tracing::trace!(
        target: "actions.dispatch",
        op = "change",
        from,
        to,
        supplied = lines.supplied(),
        lines = engine.line_count(),
        "edit"
    );
    Ok(DispatchResult::clean())
}

pub(crate) fn handle_delete(
    engine: &mut EditEngine,
    from: isize,
    to: isize,
) -> Result<DispatchResult> {
    engine
        .delete(engine_line(from), engine_line(to))
        .with_context(|| format!("delete {from},{to}"))?;
    tracing::trace!(
        target: "actions.dispatch",
        op = "delete",
        from,
        to,
        lines = engine.line_count(),
        "edit"
    );
    Ok(DispatchResult::clean())
}
