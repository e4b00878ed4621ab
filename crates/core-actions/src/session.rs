//! Session loop: read control lines, dispatch them, stop at `q` or end of input.

use std::io::{BufRead, BufWriter, Write};

use anyhow::{Context, Result};
use core_config::EffectiveConfig;
use core_state::{EditEngine, GrowthPolicy};
use tracing::info;

use crate::dispatcher::{command_parser::CommandParser, dispatch};
use crate::io_ops::read_record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Control lines executed, `q` included.
    pub commands: usize,
    pub lines_printed: usize,
    /// Session ended on `q` rather than end of input.
    pub quit: bool,
}

/// Run a full session against a fresh engine built from `config`.
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    output: W,
    config: &EffectiveConfig,
) -> Result<SessionSummary> {
    let policy = GrowthPolicy::new(config.initial_capacity, config.growth_increment);
    let mut engine = EditEngine::with_policy(policy).context("reserve command history")?;
    run_with_engine(&mut engine, input, output, config)
}

pub fn run_with_engine<R: BufRead, W: Write>(
    engine: &mut EditEngine,
    mut input: R,
    output: W,
    config: &EffectiveConfig,
) -> Result<SessionSummary> {
    let mut out = BufWriter::new(output);
    let mut line = Vec::new();
    let mut summary = SessionSummary::default();

    while read_record(&mut input, &mut line, config.max_line_bytes)
        .with_context(|| format!("read command {}", summary.commands + 1))?
    {
        let cmd = CommandParser::parse(&String::from_utf8_lossy(&line))
            .with_context(|| format!("command {}", summary.commands + 1))?;
        summary.commands += 1;
        let result = dispatch(cmd, engine, &mut input, &mut out, config)?;
        summary.lines_printed += result.printed;
        if result.quit {
            summary.quit = true;
            break;
        }
    }
    if !summary.quit {
        engine.finish();
    }
    out.flush().context("flush output")?;
    info!(
        target: "runtime",
        commands = summary.commands,
        lines_printed = summary.lines_printed,
        quit = summary.quit,
        lines = engine.line_count(),
        "session_complete"
    );
    Ok(summary)
}
