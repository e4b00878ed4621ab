//! Record reading shared by the session loop and replace commands.
//!
//! Records are byte sequences terminated by `\n`; content is never decoded.
//! Reads are bounded so an oversized line fails fast instead of buffering
//! arbitrarily much input.

use std::io::{BufRead, Read};

use core_state::{EngineError, LineSource};
use tracing::warn;

/// Read one record into `buf`, without its `\n`. `Ok(false)` at end of input.
pub fn read_record<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_line_bytes: usize,
) -> Result<bool, EngineError> {
    buf.clear();
    // Room for the limit, the separator and one byte to detect overflow.
    let limit = u64::try_from(max_line_bytes)
        .unwrap_or(u64::MAX)
        .saturating_add(2);
    let read = reader.by_ref().take(limit).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.len() > max_line_bytes {
        return Err(EngineError::LineTooLong {
            len: buf.len(),
            max: max_line_bytes,
        });
    }
    Ok(true)
}

/// New text for a replace command, read until a line holding a single `.`.
pub struct ReplacementLines<'a, R> {
    reader: &'a mut R,
    max_line_bytes: usize,
    buf: Vec<u8>,
    supplied: usize,
}

impl<'a, R: BufRead> ReplacementLines<'a, R> {
    pub fn new(reader: &'a mut R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            max_line_bytes,
            buf: Vec::new(),
            supplied: 0,
        }
    }

    /// Lines handed to the engine so far.
    pub fn supplied(&self) -> usize {
        self.supplied
    }
}

fn is_terminator(record: &[u8]) -> bool {
    record.strip_suffix(b"\r").unwrap_or(record) == b"."
}

impl<R: BufRead> LineSource for ReplacementLines<'_, R> {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, EngineError> {
        if !read_record(&mut *self.reader, &mut self.buf, self.max_line_bytes)? {
            // End of input closes the block like an explicit terminator would.
            warn!(target: "io", supplied = self.supplied, "replacement_unterminated_at_eof");
            return Ok(None);
        }
        if is_terminator(&self.buf) {
            return Ok(None);
        }
        self.supplied += 1;
        Ok(Some(std::mem::take(&mut self.buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_records_and_strips_separator() {
        let mut input = Cursor::new(b"abc\n\nlast".to_vec());
        let mut buf = Vec::new();
        assert!(read_record(&mut input, &mut buf, 16).unwrap());
        assert_eq!(buf, b"abc");
        assert!(read_record(&mut input, &mut buf, 16).unwrap());
        assert!(buf.is_empty());
        assert!(read_record(&mut input, &mut buf, 16).unwrap());
        assert_eq!(buf, b"last");
        assert!(!read_record(&mut input, &mut buf, 16).unwrap());
    }

    #[test]
    fn record_at_limit_is_accepted_and_longer_rejected() {
        let mut input = Cursor::new(b"abcd\nabcde\n".to_vec());
        let mut buf = Vec::new();
        assert!(read_record(&mut input, &mut buf, 4).unwrap());
        assert_eq!(buf, b"abcd");
        match read_record(&mut input, &mut buf, 4) {
            Err(EngineError::LineTooLong { len: 5, max: 4 }) => {}
            other => panic!("expected LineTooLong, got {:?}", other),
        }
    }

    #[test]
    fn replacement_lines_stop_at_terminator() {
        let mut input = Cursor::new(b"one\n..\n.\nafter\n".to_vec());
        let mut lines = ReplacementLines::new(&mut input, 64);
        assert_eq!(lines.next_line().unwrap(), Some(b"one".to_vec()));
        assert_eq!(lines.next_line().unwrap(), Some(b"..".to_vec()));
        assert_eq!(lines.next_line().unwrap(), None);
        assert_eq!(lines.supplied(), 2);
        // The reader is left positioned right after the terminator.
        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "after\n");
    }

    #[test]
    fn replacement_lines_end_at_eof() {
        let mut input = Cursor::new(b"dangling".to_vec());
        let mut lines = ReplacementLines::new(&mut input, 64);
        assert_eq!(lines.next_line().unwrap(), Some(b"dangling".to_vec()));
        assert_eq!(lines.next_line().unwrap(), None);
    }
}
