//! This library transcodes the markup dialects found in StarDict payload chunks into the
//! XHTML subset accepted by the macOS dictionary build pipeline.
//!
//! # Dialects
//!
//! Every chunk of a StarDict record carries a one letter type tag. The tag selects a
//! [`Dialect`], and every dialect has exactly one decoder:
//!
//! | Tag             | Dialect      | Output                                                        |
//! |-----------------|--------------|---------------------------------------------------------------|
//! | `h`             | HTML         | Sanitized to [`html::ALLOWED_TAGS`], ruby notation rewritten   |
//! | `g`             | Pango        | Wrapped verbatim in `<pre>`                                   |
//! | `x`             | XDXF         | Transformed element by element, see [`xdxf`]                  |
//! | `k`             | PowerWord    | `<div class="powerword-entry">` blocks, see [`powerword`]     |
//! | `W`, `P`, `X`   | Media        | Placeholder paragraph                                         |
//! | `r`             | Resource     | Placeholder paragraph                                         |
//! | anything else   | Plain text   | One escaped `<p class="plaintext">` per non-empty line        |
//!
//! ## XML Safety
//!
//! Dictionary data regularly contains control characters that are not allowed anywhere
//! in an XML 1.0 document. The [`escape`] module strips them, either leaving markup alone
//! ([`escape::strip_invalid`]) or additionally escaping entity characters
//! ([`escape::escape`]) for text that carries no markup of its own.
//!
//! ## Failure Model
//!
//! Decoders never fail. Data that cannot be understood degrades to a best-effort rendering
//! (usually plain text), since a partially rendered entry is more useful than an aborted
//! conversion.
//!

pub mod dialect;
pub mod error;
pub mod escape;
pub mod html;
pub mod powerword;
pub mod xdxf;

pub use dialect::Dialect;
pub use escape::{escape, strip_invalid};
