//! Content type tags and the decoder selected for each of them.

use itertools::Itertools;
use std::fmt::{self, Display};

use crate::escape::{escape, strip_invalid};
use crate::{html, powerword, xdxf};

/// Text emitted in place of audio, image and other sized media chunks
pub const MEDIA_PLACEHOLDER: &str = "Media file is not supported.";

/// Text emitted in place of resource file references
pub const RESOURCE_PLACEHOLDER: &str = "Resource file is not supported.";

/// The markup dialect of a payload chunk, derived from its one byte type tag.
///
/// | Tag                     | Dialect                   |
/// |-------------------------|---------------------------|
/// | `h`                     | [`Dialect::Html`]         |
/// | `g`                     | [`Dialect::Pango`]        |
/// | `x`                     | [`Dialect::Xdxf`]         |
/// | `k`                     | [`Dialect::PowerWord`]    |
/// | `W`, `P`, `X`           | [`Dialect::Media`]        |
/// | `r`                     | [`Dialect::Resource`]     |
/// | anything else           | [`Dialect::PlainText`]    |
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `m`, `t`, `y`, `w`, `n`, `l` and unknown tags
    PlainText,

    /// HTML, sanitized down to the allowed tag set
    Html,

    /// Pango text markup, kept verbatim
    Pango,

    /// XDXF markup
    Xdxf,

    /// KingSoft PowerWord pseudo-XML
    PowerWord,

    /// Sound, picture or other binary payload with a length prefix
    Media,

    /// Reference to a file in the resource storage
    Resource,
}

type Decoder = fn(&[u8]) -> String;

/// One decoder per dialect, in declaration order of [`Dialect`].
const DECODERS: [Decoder; 7] = [
    decode_plain_text,
    html::decode,
    decode_pango,
    xdxf::decode,
    powerword::decode,
    decode_media,
    decode_resource,
];

impl Dialect {
    /// Classify a chunk type tag.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            b'h' => Dialect::Html,
            b'g' => Dialect::Pango,
            b'x' => Dialect::Xdxf,
            b'k' => Dialect::PowerWord,
            b'W' | b'P' | b'X' => Dialect::Media,
            b'r' => Dialect::Resource,
            _ => Dialect::PlainText,
        }
    }

    /// Whether chunks of this dialect carry a 4 byte length prefix instead of a terminator.
    pub fn is_sized(self) -> bool {
        self == Dialect::Media
    }

    /// Render a chunk body as an XHTML fragment.
    pub fn decode(self, data: &[u8]) -> String {
        DECODERS[self as usize](data)
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::PlainText => "plain text",
            Dialect::Html => "html",
            Dialect::Pango => "pango",
            Dialect::Xdxf => "xdxf",
            Dialect::PowerWord => "powerword",
            Dialect::Media => "media",
            Dialect::Resource => "resource",
        };
        f.write_str(name)
    }
}

/// Escape each non-empty line into its own `<p class="plaintext">` paragraph.
pub fn decode_plain_text(data: &[u8]) -> String {
    plain_text(&String::from_utf8_lossy(data))
}

pub(crate) fn plain_text(text: &str) -> String {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| format!("<p class=\"plaintext\">{}</p>", escape(line)))
        .join("\n")
}

fn decode_pango(data: &[u8]) -> String {
    format!("<pre>{}</pre>", strip_invalid(&String::from_utf8_lossy(data)))
}

fn decode_media(_: &[u8]) -> String {
    format!("<p class=\"unsupported\">{MEDIA_PLACEHOLDER}</p>")
}

fn decode_resource(_: &[u8]) -> String {
    format!("<p class=\"unsupported\">{RESOURCE_PLACEHOLDER}</p>")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Dialect, MEDIA_PLACEHOLDER, RESOURCE_PLACEHOLDER};

    #[test]
    fn tags_map_to_dialects() {
        assert_eq!(Dialect::from_tag(b'h'), Dialect::Html);
        assert_eq!(Dialect::from_tag(b'g'), Dialect::Pango);
        assert_eq!(Dialect::from_tag(b'x'), Dialect::Xdxf);
        assert_eq!(Dialect::from_tag(b'k'), Dialect::PowerWord);
        assert_eq!(Dialect::from_tag(b'r'), Dialect::Resource);
        for tag in [b'W', b'P', b'X'] {
            assert_eq!(Dialect::from_tag(tag), Dialect::Media);
            assert!(Dialect::from_tag(tag).is_sized());
        }
        for tag in [b'm', b't', b'y', b'w', b'n', b'l', b'?'] {
            assert_eq!(Dialect::from_tag(tag), Dialect::PlainText);
        }
    }

    #[test]
    fn plain_text_paragraphs() {
        let output = Dialect::PlainText.decode(b"line one\nline two");
        assert_eq!(
            output,
            "<p class=\"plaintext\">line one</p>\n<p class=\"plaintext\">line two</p>"
        );

        let lines: Vec<&str> = output
            .split('\n')
            .map(|p| {
                p.trim_start_matches("<p class=\"plaintext\">")
                    .trim_end_matches("</p>")
            })
            .collect();
        assert_eq!(lines, vec!["line one", "line two"]);
    }

    #[test]
    fn plain_text_escapes_and_skips_blank_lines() {
        assert_eq!(
            Dialect::PlainText.decode(b"a < b\r\n\r\nc & d\n"),
            "<p class=\"plaintext\">a &lt; b</p>\n<p class=\"plaintext\">c &amp; d</p>"
        );
    }

    #[test]
    fn pango_is_wrapped_verbatim() {
        assert_eq!(
            Dialect::Pango.decode(b"<span>some pango markup</span>"),
            "<pre><span>some pango markup</span></pre>"
        );
    }

    #[test]
    fn placeholders() {
        assert!(Dialect::Media.decode(&[0xFF, 0xD8]).contains(MEDIA_PLACEHOLDER));
        assert!(Dialect::Resource.decode(b"img.png").contains(RESOURCE_PLACEHOLDER));
    }
}
