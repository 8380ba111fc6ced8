//! Types for reading whole dictionaries
//!

use dictconv_markup::{escape, strip_invalid};
use std::fs::File;
use std::io::BufReader;
use tracing::{info, instrument, warn};

use crate::{
    error::Result,
    files::StarDictFiles,
    index::Index,
    metadata::Metadata,
    payload::Payload,
    record,
    types::{Chunk, IndexEntry, RenderedEntry},
};

/// Number of rendered entries between progress events
const PROGRESS_INTERVAL: usize = 10_000;

/// A loaded StarDict dictionary
///
/// ```no_run
/// use dictconv_stardict::{StarDict, StarDictFiles};
///
/// fn list_entries() -> dictconv_stardict::error::Result<()> {
///     let files = StarDictFiles::from_ifo("dict/test.ifo")?;
///     let dict = StarDict::open(&files)?;
///
///     for entry in dict.entries() {
///         println!("{}: {}", entry.headword, entry.body);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StarDict {
    metadata: Metadata,
    index: Index,
    payload: Payload,
}

impl StarDict {
    /// Read and parse all files of a dictionary.
    #[instrument(skip(files), fields(ifo = %files.ifo.display()), err)]
    pub fn open(files: &StarDictFiles) -> Result<StarDict> {
        let metadata = Metadata::read(BufReader::new(File::open(&files.ifo)?))?;
        let index = Index::read(BufReader::new(File::open(&files.idx)?), &metadata)?;
        let payload = Payload::read(BufReader::new(File::open(&files.dict)?))?;

        if let Some(resource) = &files.resource {
            info!(path = %resource.display(), "resource files are not supported, skipping");
        }

        let dict = StarDict::new(metadata, index, payload);
        info!(
            book = dict.metadata.book_name().unwrap_or_default(),
            entries = dict.len(),
            payload = dict.payload.len(),
            "opened dictionary"
        );
        Ok(dict)
    }

    /// Assemble a dictionary from parts that are already loaded.
    pub fn new(metadata: Metadata, index: Index, payload: Payload) -> StarDict {
        if let Some(word_count) = metadata.word_count() {
            if word_count != index.len() as u64 {
                warn!(word_count, entries = index.len(), "entry count doesn't match wordcount");
            }
        }

        StarDict {
            metadata,
            index,
            payload,
        }
    }

    /// Get a reference to the metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Get a reference to the index entries
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Get the decompressed payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of entries in the index
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the dictionary contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload bytes of an entry, clamped to the end of the payload.
    pub fn record(&self, id: usize) -> Option<&[u8]> {
        let entry = self.index.get(id)?;
        Some(self.slice(entry))
    }

    fn slice(&self, entry: &IndexEntry) -> &[u8] {
        let len = self.payload.len() as u64;
        if entry.end() > len {
            warn!(
                id = entry.id,
                offset = entry.offset,
                size = entry.size,
                payload = len,
                "record runs past the end of the payload, clamping"
            );
        }

        let start = (entry.offset as u64).min(len) as usize;
        let end = entry.end().min(len) as usize;
        &self.payload[start..end]
    }

    /// Split the record of an entry into typed chunks.
    pub fn chunks(&self, id: usize) -> Option<Vec<Chunk<'_>>> {
        let data = self.record(id)?;
        Some(record::split(data, self.metadata.same_type_sequence()))
    }

    fn render(&self, entry: &IndexEntry) -> RenderedEntry {
        let data = self.slice(entry);
        let body = record::split(data, self.metadata.same_type_sequence())
            .iter()
            .map(Chunk::render)
            .collect::<Vec<_>>()
            .join("\n");

        RenderedEntry {
            id: entry.id,
            headword: escape(&entry.headword),
            body: strip_invalid(&body).into_owned(),
        }
    }

    /// Render a single entry.
    pub fn entry(&self, id: usize) -> Option<RenderedEntry> {
        self.index.get(id).map(|entry| self.render(entry))
    }

    /// Render every entry in index order.
    #[instrument(skip(self))]
    pub fn entries(&self) -> Vec<RenderedEntry> {
        let total = self.len();
        let mut rendered = Vec::with_capacity(total);

        for entry in self.index.iter() {
            rendered.push(self.render(entry));

            if rendered.len() % PROGRESS_INTERVAL == 0 {
                info!(done = rendered.len(), total, "rendering entries");
            }
        }

        info!(total, "rendered all entries");
        rendered
    }

    /// Take apart the dictionary
    pub fn into_parts(self) -> (Metadata, Index, Payload) {
        (self.metadata, self.index, self.payload)
    }
}
