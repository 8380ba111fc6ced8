//! Loading of `.dict` payloads.
//!
//! `.dict.dz` files are dictzip archives, which are gzip streams with extra header
//! fields. Any payload starting with the gzip magic is decompressed in full; everything
//! else is used as is.

use derive_more::derive::Deref;
use flate2::read::MultiGzDecoder;
use std::io::Read;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Leading bytes of every gzip stream
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Decompressed payload bytes of a dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Payload(Vec<u8>);

/// Whether `data` starts with the gzip magic
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

impl Payload {
    /// Take ownership of payload bytes, decompressing them if they are gzip compressed.
    #[instrument(skip_all, fields(size = data.len()), err)]
    pub fn new(data: Vec<u8>) -> Result<Payload> {
        if !is_gzip(&data) {
            return Ok(Payload(data));
        }

        let mut decompressed = Vec::new();
        MultiGzDecoder::new(data.as_slice())
            .read_to_end(&mut decompressed)
            .map_err(Error::Decompression)?;
        debug!(
            compressed = data.len(),
            decompressed = decompressed.len(),
            "decompressed payload"
        );

        Ok(Payload(decompressed))
    }

    /// Read a `.dict` or `.dict.dz` file.
    pub fn read<R: Read>(mut reader: R) -> Result<Payload> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Payload::new(data)
    }

    /// Unwrap the decompressed bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}
