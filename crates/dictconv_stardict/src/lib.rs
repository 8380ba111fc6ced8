//! # StarDict Format Documentation
//!
//! This crate reads dictionaries in the **StarDict** format and renders their entries as
//! XHTML fragments. A dictionary is a set of files sharing one file stem:
//!
//! | File          | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | `.ifo`        | Text metadata, one `name=value` pair per line                 |
//! | `.idx`        | Binary index of headwords and the location of their records   |
//! | `.dict`       | Binary payload holding the records                            |
//! | `.dict.dz`    | The payload compressed with dictzip (gzip compatible)         |
//! | `res/`        | Optional resource files referenced by records, not supported  |
//!
//! ## Metadata
//!
//! The `.ifo` starts with the line `StarDict's dict ifo file`. Fields used for decoding:
//!
//! - **wordcount**: Number of records in the index. Required.
//! - **idxfilesize**: Size of the `.idx` file in bytes, only used as a sanity check.
//! - **sametypesequence**: Type tags shared by every record. When present, records do not
//!   carry their own tags.
//! - **idxoffsetbits**: Width of index offsets. Only `32` is supported.
//! - **bookname**: Title of the dictionary.
//!
//! ## Index
//!
//! The `.idx` file is a list of `wordcount` records. Each record has the following
//! structure:
//!
//! | Offset (bytes) | Field    | Description                                          |
//! |----------------|----------|------------------------------------------------------|
//! | 0x0000         | Headword | Null terminated UTF-8 string                         |
//! | n + 1          | Offset   | 4 bytes: Start of the record in the payload          |
//! | n + 5          | Size     | 4 bytes: Size of the record in the payload           |
//!
//! ## Payload
//!
//! A record is a run of chunks, each tagged with one of the following types:
//!
//! | Tag             | Contents                       |
//! |-----------------|--------------------------------|
//! | `m t y l w n`   | Plain text                     |
//! | `h`             | HTML                           |
//! | `g`             | Pango markup                   |
//! | `x`             | XDXF                           |
//! | `k`             | PowerWord markup               |
//! | `r`             | Resource file list             |
//! | `W P X`         | Sized media (sound, picture)   |
//!
//! See [`record`] for how chunk boundaries are found.
//!
//! ## Additional Information
//!
//! - **Endianness**: Big-endian for all multi-byte integers
//!

pub mod cursor;
pub mod error;
pub mod files;
pub mod index;
pub mod metadata;
pub mod payload;
pub mod read;
pub mod record;
#[cfg(feature = "serde")]
mod serde;
pub mod types;

pub use files::StarDictFiles;
pub use read::StarDict;
pub use types::RenderedEntry;
