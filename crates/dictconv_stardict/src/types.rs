//! Base types for the structure of StarDict files and rendered output.

use binrw::{BinRead, NullString};
use dictconv_markup::Dialect;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Raw `.idx` record
///
/// A null terminated UTF-8 headword followed by the location of its data in the payload.
/// Integers are stored in network byte order.
#[derive(BinRead, Debug, Clone, PartialEq)]
#[br(big)]
pub struct IdxRecord {
    /// Headword bytes without the terminator
    pub headword: NullString,

    /// Offset of the record data from the start of the decompressed payload
    pub offset: u32,

    /// Size of the record data
    pub size: u32,
}

/// An index entry with its position in the index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexEntry {
    /// Ordinal of the entry in file order, starting at 0
    pub id: usize,

    /// Headword, decoded lossily from UTF-8
    pub headword: String,

    /// Offset of the record data in the payload
    pub offset: u32,

    /// Size of the record data
    pub size: u32,
}

impl IndexEntry {
    /// Offset one past the last byte of the record, without overflow
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

/// One typed piece of a payload record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// The type tag the chunk was split with
    pub tag: u8,

    /// Chunk body, borrowed from the payload
    pub data: &'a [u8],
}

impl<'a> Chunk<'a> {
    pub fn new(tag: u8, data: &'a [u8]) -> Self {
        Chunk { tag, data }
    }

    /// Dialect selected by the type tag
    pub fn dialect(&self) -> Dialect {
        Dialect::from_tag(self.tag)
    }

    /// Decode the chunk into an XHTML fragment.
    pub fn render(&self) -> String {
        self.dialect().decode(self.data)
    }
}

/// A decoded dictionary entry, ready for document assembly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RenderedEntry {
    /// Ordinal of the entry in the index
    pub id: usize,

    /// Headword, escaped for XML text and attribute use
    pub headword: String,

    /// XHTML fragments of all chunks joined by newlines
    pub body: String,
}
