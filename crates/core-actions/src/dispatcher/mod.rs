//! Dispatcher applying a `ParsedCommand` to the edit engine.
//!
//! Sub-modules:
//! * `command_parser` - control line parsing
//! * `edit`    - change / delete
//! * `undo`    - undo / redo queueing
//! * `print`   - rendering a line range to the output
//!
//! A change command pulls its replacement lines from the same reader the
//! control lines come from, so `dispatch` receives the session input as well
//! as the output sink.

use std::io::{BufRead, Write};

use anyhow::Result;
use core_config::EffectiveConfig;
use core_state::EditEngine;

pub mod command_parser;
mod edit;
mod print;
mod undo;

use command_parser::ParsedCommand;

/// Result of dispatching a single command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub quit: bool,
    /// Lines written to the output by this command.
    pub printed: usize,
}

impl DispatchResult {
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            quit: true,
            printed: 0,
        }
    }
    pub fn printed(lines: usize) -> Self {
        Self {
            quit: false,
            printed: lines,
        }
    }
}

/// Engine position for a protocol line number: everything below 1 maps to 0,
/// which the engine treats as "before the first line".
pub(crate) fn engine_line(n: isize) -> usize {
    n.max(0).unsigned_abs()
}

pub fn dispatch<R: BufRead, W: Write>(
    cmd: ParsedCommand,
    engine: &mut EditEngine,
    input: &mut R,
    output: &mut W,
    config: &EffectiveConfig,
) -> Result<DispatchResult> {
    match cmd {
        ParsedCommand::Change { from, to } => {
            edit::handle_change(engine, from, to, input, config.max_line_bytes)
        }
        ParsedCommand::Delete { from, to } => edit::handle_delete(engine, from, to),
        ParsedCommand::Print { from, to } => {
            print::handle_print(engine, from, to, output, &config.placeholder)
        }
        ParsedCommand::Undo(steps) => Ok(undo::handle_undo(engine, steps)),
        ParsedCommand::Redo(steps) => Ok(undo::handle_redo(engine, steps)),
        ParsedCommand::Quit => {
            tracing::trace!(target: "actions.dispatch", op = "quit", "quit");
            Ok(DispatchResult::quit())
        }
    }
}
