//! Error types that can be emitted from this library
//!
//! Dialect decoders never fail outright; these errors surface only from the
//! strict parsing entry points and are turned into best-effort output by the
//! decoders that call them.

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`quick_xml::Error`]
    #[error(transparent)]
    XmlError(#[from] quick_xml::Error),

    /// Element closed without a matching open tag
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    /// Fragment ended with open elements
    #[error("unclosed element <{0}>")]
    Unclosed(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
