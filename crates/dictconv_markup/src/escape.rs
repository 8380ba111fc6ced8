//! XML 1.0 safety encoding.
//!
//! Two modes are offered: [`strip_invalid`] only removes code points that can never
//! appear in an XML 1.0 document and is safe on text that already contains markup,
//! while [`escape`] strips and then replaces the five entity characters so the
//! result can be used as element text or an attribute value.

use std::borrow::Cow;

/// Whether `c` may appear in an XML 1.0 document.
#[inline]
pub fn is_xml_char(c: char) -> bool {
    matches!(c as u32,
        0x09 | 0x0A | 0x0D
        | 0x20..=0xD7FF
        | 0xE000..=0xFDCF
        | 0xFDE0..=0xFFFD
        | 0x1_0000..=0x10_FFFF
    )
}

/// Remove every code point outside the XML 1.0 character ranges.
///
/// Borrows the input when nothing has to be removed.
pub fn strip_invalid(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
}

/// Strip invalid code points and escape `&`, `<`, `>`, `"` and `'`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
