//! Supplier of replacement text for `EditEngine::replace`.

use std::collections::VecDeque;

use crate::EngineError;

/// Yields the new lines of a replace command one at a time.
///
/// `Ok(None)` marks the terminator; the engine stops pulling at that point.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, EngineError>;
}

impl LineSource for VecDeque<Vec<u8>> {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, EngineError> {
        Ok(self.pop_front())
    }
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> Result<Option<Vec<u8>>, EngineError> {
        (**self).next_line()
    }
}

/// Collect string literals into an owned source (handy for tests and benches).
pub fn lines_from<I, T>(lines: I) -> VecDeque<Vec<u8>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    lines.into_iter().map(|l| l.as_ref().to_vec()).collect()
}
