//! Protocol layer between the byte stream and the edit engine.
//!
//! `session` drives the loop, `dispatcher` maps each parsed control line onto
//! `EditEngine` calls and `io_ops` owns record reading.

pub mod dispatcher;
pub mod io_ops;
pub mod session;

pub use dispatcher::command_parser::{CommandParser, ParseError, ParsedCommand};
pub use dispatcher::{DispatchResult, dispatch};
pub use io_ops::{ReplacementLines, read_record};
pub use session::{SessionSummary, run_session, run_with_engine};
