use std::collections::TryReserveError;

use thiserror::Error;

/// Failures that end an editing session. None of them leave the engine in a
/// state worth recovering.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("command history cannot grow past {capacity} slots")]
    HistoryExhausted {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("replacement line of {len} bytes exceeds the {max} byte limit")]
    LineTooLong { len: usize, max: usize },
    #[error("failed to read replacement text")]
    Source(#[from] std::io::Error),
}
