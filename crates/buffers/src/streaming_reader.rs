//! Streaming reader with internal buffer management.

use crate::Writer;

/// A streaming reader that accumulates fed chunks in a growing buffer.
///
/// Data chunks are pushed into the reader and consumed incrementally. The
/// cursor is tracked as an offset `dx` past the writer's consumed origin, so
/// it stays valid when buffer growth rebases the storage. A caller commits
/// bytes with [`StreamingReader::skip`] only after a successful read against
/// [`StreamingReader::remaining`], and [`StreamingReader::rewind`] rolls the
/// cursor back to the last [`StreamingReader::consume`] point.
pub struct StreamingReader {
    writer: Writer,
    /// Cursor offset past the consumed origin (`x0` of the writer).
    dx: usize,
}

impl Default for StreamingReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingReader {
    /// Creates a new streaming reader with the default buffer capacity.
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024)
    }

    /// Creates a new streaming reader with a custom buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writer: Writer::with_capacity(capacity),
            dx: 0,
        }
    }

    /// Adds a chunk of data to the tail of the buffered region.
    pub fn push(&mut self, data: &[u8]) {
        self.writer.buf(data);
    }

    /// Returns the number of unread bytes.
    pub fn size(&self) -> usize {
        self.writer.x - self.x()
    }

    /// Returns the unread bytes without advancing the cursor.
    pub fn remaining(&self) -> &[u8] {
        &self.writer.uint8[self.x()..self.writer.x]
    }

    fn x(&self) -> usize {
        self.writer.x0 + self.dx
    }

    /// Advances the cursor by `length` already-validated bytes.
    pub fn skip(&mut self, length: usize) {
        debug_assert!(length <= self.size());
        self.dx += length;
    }

    /// Marks everything before the cursor as consumed, freeing it for reuse.
    ///
    /// A subsequent buffer growth drops the consumed prefix instead of
    /// copying it.
    pub fn consume(&mut self) {
        self.writer.x0 += self.dx;
        self.dx = 0;
    }

    /// Rewinds the cursor to the start of the currently buffered region.
    ///
    /// Buffered bytes are kept; only bytes released by an earlier
    /// [`StreamingReader::consume`] call are out of reach.
    pub fn rewind(&mut self) {
        self.dx = 0;
    }
}
