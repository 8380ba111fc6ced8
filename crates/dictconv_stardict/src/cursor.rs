//! A bounded cursor over a borrowed byte slice.
//!
//! Every step consumes the cursor and hands back the advanced one, so scans over
//! a record read as a chain of moves. Reads never go past the end of the slice:
//! they are clamped and report what was actually available.

use byteorder::{BigEndian, ByteOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, position: 0 }
    }

    /// Current offset from the start of the slice
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    fn advance(self, len: usize) -> Self {
        ByteCursor {
            data: self.data,
            position: self.position.saturating_add(len).min(self.data.len()),
        }
    }

    /// Read one byte, `None` at the end.
    pub fn read_u8(self) -> (Option<u8>, Self) {
        match self.remaining().first() {
            Some(&byte) => (Some(byte), self.advance(1)),
            None => (None, self),
        }
    }

    /// Read a big endian `u32`.
    ///
    /// With fewer than 4 bytes left the rest is consumed and `None` returned.
    pub fn read_u32(self) -> (Option<u32>, Self) {
        let remaining = self.remaining();
        if remaining.len() < 4 {
            return (None, self.advance(remaining.len()));
        }
        (Some(BigEndian::read_u32(remaining)), self.advance(4))
    }

    /// Take up to `len` bytes.
    pub fn take(self, len: usize) -> (&'a [u8], Self) {
        let remaining = self.remaining();
        let len = len.min(remaining.len());
        (&remaining[..len], self.advance(len))
    }

    /// Take everything that is left.
    pub fn take_rest(self) -> (&'a [u8], Self) {
        let remaining = self.remaining();
        (remaining, self.advance(remaining.len()))
    }

    /// Take bytes up to the next null byte and step over the terminator.
    ///
    /// Without a terminator everything left is taken.
    pub fn take_until_nul(self) -> (&'a [u8], Self) {
        let remaining = self.remaining();
        match remaining.iter().position(|&b| b == 0) {
            Some(len) => (&remaining[..len], self.advance(len + 1)),
            None => (remaining, self.advance(remaining.len())),
        }
    }

    /// Step over up to `len` bytes.
    pub fn skip(self, len: usize) -> Self {
        self.advance(len)
    }
}
