//! Parsing of `.ifo` metadata files

use derive_more::derive::Deref;
use indexmap::IndexMap;
use std::io::Read;
use tracing::{debug, instrument};

use crate::error::Result;

/// The first line of every `.ifo` file
pub const IFO_MAGIC: &str = "StarDict's dict ifo file";

/// Key/value metadata of a StarDict dictionary.
///
/// Keys keep the order in which they first appear; a repeated key overwrites the earlier
/// value. The numeric fields `wordcount` and `idxfilesize` are parsed once on load and
/// stay unset if absent or not a base-10 integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Metadata {
    #[deref]
    fields: IndexMap<String, String>,
    word_count: Option<u64>,
    idx_file_size: Option<u64>,
}

/// Split a line the way `^(.+)=(.+)$` would: at the last `=` that leaves both sides non-empty.
fn split_line(line: &str) -> Option<(&str, &str)> {
    line.char_indices()
        .rev()
        .filter(|&(i, c)| c == '=' && i > 0 && i + 1 < line.len())
        .map(|(i, _)| (&line[..i], &line[i + 1..]))
        .next()
}

impl Metadata {
    /// Parse the text of an `.ifo` file.
    ///
    /// Lines that are not `name=value` pairs, such as the magic header or blank lines,
    /// are skipped.
    pub fn parse(text: &str) -> Metadata {
        let mut fields = IndexMap::new();
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if let Some((key, value)) = split_line(line) {
                fields.insert(key.to_string(), value.to_string());
            }
        }

        let word_count = fields.get("wordcount").and_then(|v| v.parse().ok());
        let idx_file_size = fields.get("idxfilesize").and_then(|v| v.parse().ok());

        Metadata {
            fields,
            word_count,
            idx_file_size,
        }
    }

    /// Read and parse an `.ifo` file.
    #[instrument(skip_all, err)]
    pub fn read<R: Read>(mut reader: R) -> Result<Metadata> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let text = String::from_utf8_lossy(&data);

        if !text.starts_with(IFO_MAGIC) {
            debug!("metadata does not start with the usual ifo header");
        }

        let metadata = Metadata::parse(&text);
        debug!(fields = metadata.len(), "parsed metadata");
        Ok(metadata)
    }

    /// Number of entries declared in the index
    pub fn word_count(&self) -> Option<u64> {
        self.word_count
    }

    /// Declared size of the `.idx` file in bytes
    pub fn idx_file_size(&self) -> Option<u64> {
        self.idx_file_size
    }

    /// Human readable title of the dictionary
    pub fn book_name(&self) -> Option<&str> {
        self.fields.get("bookname").map(String::as_str)
    }

    /// Format version, usually `2.4.2` or `3.0.0`
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").map(String::as_str)
    }

    /// Type tags shared by every record, if the dictionary declares them.
    pub fn same_type_sequence(&self) -> Option<&str> {
        self.fields
            .get("sametypesequence")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Width of the index offset field in bits, 32 unless declared otherwise.
    pub fn idx_offset_bits(&self) -> u32 {
        self.fields
            .get("idxoffsetbits")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(32)
    }

    /// The raw value of any field
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}
