//! Locating the files that make up a dictionary

use bon::Builder;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Paths of the files belonging to one dictionary
///
/// ```no_run
/// use dictconv_stardict::files::StarDictFiles;
///
/// let files = StarDictFiles::builder()
///     .ifo("dict/test.ifo")
///     .idx("dict/test.idx")
///     .dict("dict/test.dict.dz")
///     .build();
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct StarDictFiles {
    /// The `.ifo` metadata file
    #[builder(into)]
    pub ifo: PathBuf,

    /// The `.idx` index file
    #[builder(into)]
    pub idx: PathBuf,

    /// The `.dict` or `.dict.dz` payload file
    #[builder(into)]
    pub dict: PathBuf,

    /// The `res/` resource directory, if there is one
    #[builder(into)]
    pub resource: Option<PathBuf>,
}

impl StarDictFiles {
    /// Find the companion files of an `.ifo` file in its directory.
    ///
    /// Companions share the file stem of the `.ifo`. An uncompressed `.dict` is preferred
    /// over a `.dict.dz`.
    pub fn from_ifo(ifo: impl AsRef<Path>) -> Result<StarDictFiles> {
        let ifo = ifo.as_ref();

        let idx = ifo.with_extension("idx");
        if !idx.is_file() {
            return Err(Error::MissingCompanion(idx));
        }

        let dict = ifo.with_extension("dict");
        let dict = if dict.is_file() {
            dict
        } else {
            let compressed = ifo.with_extension("dict.dz");
            if !compressed.is_file() {
                return Err(Error::MissingCompanion(compressed));
            }
            compressed
        };

        let resource = ifo
            .parent()
            .map(|dir| dir.join("res"))
            .filter(|dir| dir.is_dir());
        debug!(?idx, ?dict, ?resource, "found dictionary files");

        Ok(StarDictFiles {
            ifo: ifo.to_path_buf(),
            idx,
            dict,
            resource,
        })
    }
}
