//! Parsing of `.idx` index files

use binrw::BinRead;
use derive_more::derive::Deref;
use std::io::{Cursor, Read};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::types::{IdxRecord, IndexEntry};

/// Smallest possible record: an empty headword terminator plus offset and size
const MIN_RECORD_SIZE: usize = 9;

/// Entries of a dictionary in index order
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Index(Vec<IndexEntry>);

impl Index {
    /// Parse an index using the word count and file size declared in the metadata.
    ///
    /// Fails if `wordcount` is missing, or if the dictionary uses 64-bit offsets. A
    /// declared `idxfilesize` that does not match is only reported.
    #[instrument(skip_all, fields(size = data.len()), err)]
    pub fn parse(data: &[u8], metadata: &Metadata) -> Result<Index> {
        let offset_bits = metadata.idx_offset_bits();
        if offset_bits != 32 {
            return Err(Error::UnsupportedOffsetBits(offset_bits));
        }

        let word_count = metadata
            .word_count()
            .ok_or(Error::MissingField("wordcount"))?;

        match metadata.idx_file_size() {
            Some(declared) if declared != data.len() as u64 => warn!(
                declared,
                actual = data.len(),
                "index file size doesn't match idxfilesize"
            ),
            None => debug!("metadata doesn't declare idxfilesize"),
            _ => {}
        }

        Index::parse_records(data, word_count)
    }

    /// Parse exactly `word_count` records from the start of `data`.
    pub fn parse_records(data: &[u8], word_count: u64) -> Result<Index> {
        let capacity = usize::try_from(word_count)
            .unwrap_or(usize::MAX)
            .min(data.len() / MIN_RECORD_SIZE);
        let mut entries = Vec::with_capacity(capacity);
        let mut reader = Cursor::new(data);

        for id in 0..word_count as usize {
            let position = reader.position();
            let record = IdxRecord::read(&mut reader)
                .map_err(|_| Error::TruncatedIndex { entry: id, position })?;

            entries.push(IndexEntry {
                id,
                headword: String::from_utf8_lossy(&record.headword.0).into_owned(),
                offset: record.offset,
                size: record.size,
            });
        }

        let consumed = reader.position();
        if consumed != data.len() as u64 {
            warn!(
                consumed,
                size = data.len(),
                word_count,
                "index holds more data than wordcount records"
            );
        }

        Ok(Index(entries))
    }

    /// Read and parse an `.idx` file.
    pub fn read<R: Read>(mut reader: R, metadata: &Metadata) -> Result<Index> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Index::parse(&data, metadata)
    }

    /// Unwrap the entries
    pub fn into_inner(self) -> Vec<IndexEntry> {
        self.0
    }
}
