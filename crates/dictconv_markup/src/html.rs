//! HTML sanitizing for `h` chunks.
//!
//! Dictionary HTML is frequently tag soup, so this works on the token level with
//! regular expressions instead of building a document: dangerous blocks are cut out
//! with their content, ruby notation is rewritten into `<ruby>` markup, and every tag
//! outside [`ALLOWED_TAGS`] is dropped while its inner text is kept.
//!
//! Text between tags is made well-formed XML: HTML entities such as `&nbsp;` become
//! characters and stray `&`, `<` and `>` are escaped.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::escape::{escape, is_xml_char, strip_invalid};

/// Elements that survive sanitizing
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "br", "em", "font", "i", "img", "span", "strong", "sub", "sup", "table", "tbody",
    "td", "th", "thead", "tr", "u", "ruby", "rp", "rt",
];

/// Elements that never have content and must be self-closed in XHTML
pub const VOID_TAGS: &[&str] = &[
    "br", "img", "hr", "meta", "link", "input", "area", "base", "col", "embed", "param",
    "source", "track", "wbr",
];

/// Elements removed together with everything between their open and close tags
const BLOCKED_TAGS: &[&str] = &["script", "style", "iframe", "object", "embed"];

/// Attributes allowed on any element
const GLOBAL_ATTRIBUTES: &[&str] = &["class", "style"];

static BLOCKED_PATTERN: OnceLock<Regex> = OnceLock::new();
static COMMENT_PATTERN: OnceLock<Regex> = OnceLock::new();
static RUBY_PATTERN: OnceLock<Regex> = OnceLock::new();
static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE_PATTERN: OnceLock<Regex> = OnceLock::new();
static REFERENCE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn blocked_regex() -> &'static Regex {
    BLOCKED_PATTERN.get_or_init(|| {
        let alternatives = BLOCKED_TAGS
            .iter()
            .map(|tag| format!(r"<{tag}\b[^>]*>.*?</{tag}\s*>"))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?is){alternatives}")).expect("Invalid blocked tag regex pattern")
    })
}

fn comment_regex() -> &'static Regex {
    COMMENT_PATTERN.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex pattern"))
}

/// Matches `` `N`word`N`pronunciation `` where the digit markers carry no meaning for us.
fn ruby_regex() -> &'static Regex {
    RUBY_PATTERN.get_or_init(|| {
        Regex::new(r"`\d+`([^`]*?)`\d+`([^`<\s]*)").expect("Invalid ruby regex pattern")
    })
}

fn tag_regex() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| {
        Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
            .expect("Invalid tag regex pattern")
    })
}

fn attribute_regex() -> &'static Regex {
    ATTRIBUTE_PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("Invalid attribute regex pattern")
    })
}

/// Matches every `&`, together with the character or entity reference it starts, if any.
fn reference_regex() -> &'static Regex {
    REFERENCE_PATTERN.get_or_init(|| {
        Regex::new(r"&(?:#([0-9]{1,7});|#[xX]([0-9A-Fa-f]{1,6});|([A-Za-z][A-Za-z0-9]*);)?")
            .expect("Invalid reference regex pattern")
    })
}

/// Characters for the HTML named entities that XML does not predefine
fn html_entity(name: &str) -> Option<char> {
    let c = match name {
        "nbsp" => '\u{a0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "zwnj" => '\u{200c}',
        "zwj" => '\u{200d}',
        "shy" => '\u{ad}',
        "iexcl" => '¡',
        "iquest" => '¿',
        "cent" => '¢',
        "pound" => '£',
        "yen" => '¥',
        "euro" => '€',
        "sect" => '§',
        "para" => '¶',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "deg" => '°',
        "plusmn" => '±',
        "times" => '×',
        "divide" => '÷',
        "middot" => '·',
        "bull" => '•',
        "hellip" => '…',
        "laquo" => '«',
        "raquo" => '»',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "ndash" => '–',
        "mdash" => '—',
        "larr" => '←',
        "rarr" => '→',
        _ => return None,
    };
    Some(c)
}

fn fix_reference(caps: &Captures) -> String {
    let whole = &caps[0];
    let code = caps
        .get(1)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .or_else(|| caps.get(2).and_then(|m| u32::from_str_radix(m.as_str(), 16).ok()));
    if caps.get(1).is_some() || caps.get(2).is_some() {
        return match code.and_then(char::from_u32) {
            Some(c) if is_xml_char(c) => whole.to_owned(),
            _ => String::new(),
        };
    }

    match caps.get(3).map(|m| m.as_str()) {
        Some("lt" | "gt" | "amp" | "quot" | "apos") => whole.to_owned(),
        Some(name) => match html_entity(name) {
            Some(c) => c.to_string(),
            None => format!("&amp;{name};"),
        },
        None => "&amp;".to_owned(),
    }
}

/// Make a text run between tags well-formed XML.
///
/// HTML-only entities are resolved, stray `&` and angle brackets are escaped, valid
/// XML references are kept as they are.
fn fix_text(text: &str) -> String {
    reference_regex()
        .replace_all(text, fix_reference)
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "name", "target", "title"],
        "img" => &["src", "alt", "title", "width", "height"],
        "font" => &["color", "face", "size"],
        "td" | "th" => &["colspan", "rowspan", "align"],
        _ => &[],
    }
}

/// Rewrite `` `1`智`2`zhì `` into `<ruby>智<rt>zhì</rt></ruby>`.
pub fn rewrite_ruby(html: &str) -> String {
    ruby_regex()
        .replace_all(html, "<ruby>${1}<rt>${2}</rt></ruby>")
        .into_owned()
}

fn filter_attributes(tag: &str, raw: &str) -> String {
    let allowed = allowed_attributes(tag);
    let mut out = String::new();

    for cap in attribute_regex().captures_iter(raw) {
        let name = cap[1].to_ascii_lowercase();
        if !GLOBAL_ATTRIBUTES.contains(&name.as_str()) && !allowed.contains(&name.as_str()) {
            continue;
        }

        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map_or(name.as_str(), |m| m.as_str());
        let value = quick_xml::escape::unescape(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_owned());

        if matches!(name.as_str(), "href" | "src")
            && value.trim_start().to_ascii_lowercase().starts_with("javascript:")
        {
            continue;
        }

        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&escape(&value));
        out.push('"');
    }

    out
}

fn filter_tag(caps: &Captures) -> String {
    let name = caps[2].to_ascii_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return String::new();
    }

    let is_void = VOID_TAGS.contains(&name.as_str());
    if !caps[1].is_empty() {
        return if is_void {
            String::new()
        } else {
            format!("</{name}>")
        };
    }

    let raw = &caps[3];
    let self_closing = is_void || raw.trim_end().ends_with('/');
    let attributes = filter_attributes(&name, raw);
    if self_closing {
        format!("<{name}{attributes}/>")
    } else {
        format!("<{name}{attributes}>")
    }
}

/// Reduce an HTML fragment to the allowed XHTML subset.
pub fn sanitize(html: &str) -> String {
    let html = rewrite_ruby(html);
    let html = comment_regex().replace_all(&html, "");
    let html = blocked_regex().replace_all(&html, "");

    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for caps in tag_regex().captures_iter(&html) {
        let Some(tag) = caps.get(0) else { continue };
        out.push_str(&fix_text(&html[last..tag.start()]));
        out.push_str(&filter_tag(&caps));
        last = tag.end();
    }
    out.push_str(&fix_text(&html[last..]));

    strip_invalid(&out).into_owned()
}

/// Decoder for `h` chunks.
pub fn decode(data: &[u8]) -> String {
    sanitize(&String::from_utf8_lossy(data))
}
