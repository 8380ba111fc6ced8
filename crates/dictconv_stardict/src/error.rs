//! Error types that can be emitted from this library

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// A metadata field needed for decoding is absent or not a number
    #[error("metadata field {0} is missing or invalid")]
    #[diagnostic(help("the .ifo file must declare it as a base-10 integer, e.g. `wordcount=1234`"))]
    MissingField(&'static str),

    /// The index uses an offset width other than 32 bits
    #[error("{0}-bit index offsets are not supported")]
    #[diagnostic(help("only dictionaries with idxoffsetbits=32 (the default) can be decoded"))]
    UnsupportedOffsetBits(u32),

    /// An index record runs past the end of the index file
    #[error("index entry {entry} is truncated at byte {position}")]
    TruncatedIndex {
        /// Ordinal of the record that could not be read
        entry: usize,
        /// Byte position in the index where the record starts
        position: u64,
    },

    /// The payload looked gzip compressed but could not be decompressed
    #[error("unable to decompress dictionary payload")]
    Decompression(#[source] std::io::Error),

    /// A file belonging to the dictionary could not be found
    #[error("unable to find companion file {0}")]
    MissingCompanion(PathBuf),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
