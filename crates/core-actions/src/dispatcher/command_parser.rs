//! Structured control line parsing.
//!
//! Converts one raw control line into a `ParsedCommand`. The command code is
//! always the last character; everything before it is either a `from,to` range
//! (`c`, `d`, `p`) or a step count (`u`, `r`). A bare `q` ends the session.
//! Range bounds are signed: positions below 1 are legal and left to the
//! dispatcher to clamp or render as placeholders.
//!
//! Parsing is pure: no engine access, no side-effects. Malformed lines come
//! back as `ParseError` and the session decides what to do with them.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedCommand {
    Change { from: isize, to: isize },
    Delete { from: isize, to: isize },
    Print { from: isize, to: isize },
    Undo(usize),
    Redo(usize),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command line")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("range `{0}` is missing a `,`")]
    MissingComma(String),
    #[error("`{0}` is not a line number")]
    InvalidNumber(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> Result<ParsedCommand, ParseError> {
        let s = raw.trim();
        if s == "q" {
            return Ok(ParsedCommand::Quit);
        }
        let Some((split, code)) = s.char_indices().next_back() else {
            return Err(ParseError::Empty);
        };
        let body = &s[..split];
        match code {
            'c' => parse_range(body).map(|(from, to)| ParsedCommand::Change { from, to }),
            'd' => parse_range(body).map(|(from, to)| ParsedCommand::Delete { from, to }),
            'p' => parse_range(body).map(|(from, to)| ParsedCommand::Print { from, to }),
            'u' => parse_number(body).map(ParsedCommand::Undo),
            'r' => parse_number(body).map(ParsedCommand::Redo),
            _ => Err(ParseError::Unknown(s.to_string())),
        }
    }
}

fn parse_range(body: &str) -> Result<(isize, isize), ParseError> {
    let (from, to) = body
        .split_once(',')
        .ok_or_else(|| ParseError::MissingComma(body.to_string()))?;
    Ok((parse_number(from)?, parse_number(to)?))
}

fn parse_number<T: FromStr>(s: &str) -> Result<T, ParseError> {
    s.trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber(s.to_string()))
}
