//! KingSoft PowerWord pseudo-XML for `k` chunks.
//!
//! The data is a flat run of `<JS>` blocks. It is not guaranteed to be well-formed
//! XML, so the blocks are picked apart with a token scan:
//!
//! ```text
//! <JS>
//!   <CY><CX>
//!     <YX>headword</YX>
//!     <YB><CB>english phonetic</CB><PY>pinyin</PY></YB>
//!     <DX>part of speech</DX>
//!     <JX>definition or &L{..}&L{..} segments</JX>
//!   </CX></CY>
//! </JS>
//! ```
//!
//! Text runs are usually wrapped in `<![CDATA[..]]>`.

use itertools::Itertools;
use regex::{Captures, Regex};
use std::{borrow::Cow, sync::OnceLock};
use tracing::debug;

use crate::dialect::plain_text;
use crate::escape::escape;

struct Patterns {
    entry: Regex,
    phonetic_block: Regex,
    phonetic: Regex,
    part_of_speech: Regex,
    definition: Regex,
    cdata: Regex,
    entity: Regex,
    pinyin_wrapper: Regex,
    segment: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn element(name: &str) -> Regex {
    Regex::new(&format!(r"(?s)<{name}>(.*?)</{name}>")).expect("Invalid powerword element pattern")
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        entry: element("JS"),
        phonetic_block: element("YB"),
        phonetic: Regex::new(r"(?s)<(?:CB|PY)>(.*?)</(?:CB|PY)>")
            .expect("Invalid powerword phonetic pattern"),
        part_of_speech: element("DX"),
        definition: element("JX"),
        cdata: Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("Invalid cdata pattern"),
        entity: Regex::new(r"&(lt|gt|amp|quot|apos);").expect("Invalid entity pattern"),
        pinyin_wrapper: Regex::new(r"&x\{([^}]*)\}").expect("Invalid pinyin wrapper pattern"),
        segment: Regex::new(r"&L\{([^}]*)\}").expect("Invalid definition segment pattern"),
    })
}

fn unescape(text: &str) -> Cow<'_, str> {
    patterns().entity.replace_all(text, |c: &Captures| match &c[1] {
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => "&",
    })
}

/// Text of a run: CDATA sections verbatim, everything else with XML entities resolved.
fn text_run(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for c in patterns().cdata.captures_iter(text) {
        let Some(section) = c.get(0) else { continue };
        out.push_str(&unescape(&text[last..section.start()]));
        out.push_str(&c[1]);
        last = section.end();
    }
    out.push_str(&unescape(&text[last..]));
    out
}

/// One `<JS>` block reduced to what gets rendered
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Entry {
    /// English phonetics and pinyin, in encounter order
    pub phonetics: Vec<String>,

    /// Rendered definition paragraphs, already escaped
    pub definitions: Vec<String>,
}

impl Entry {
    /// Extract phonetics and definitions from the inside of a `<JS>` block.
    pub fn parse(block: &str) -> Entry {
        let p = patterns();

        let phonetics = p
            .phonetic_block
            .captures_iter(block)
            .flat_map(|yb| {
                p.phonetic
                    .captures_iter(yb.get(1).map_or("", |m| m.as_str()))
                    .map(|c| {
                        let text = text_run(&c[1]);
                        p.pinyin_wrapper
                            .replace_all(&text, "${1}")
                            .trim()
                            .to_string()
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let mut parts_of_speech = p
            .part_of_speech
            .captures_iter(block)
            .map(|c| text_run(&c[1]).trim().to_string())
            .collect::<Vec<_>>()
            .into_iter();

        let mut definitions = Vec::new();
        let mut pair_with_pos = true;
        for jx in p.definition.captures_iter(block) {
            let text = text_run(&jx[1]);

            if p.segment.is_match(&text) {
                // Chinese to English: every segment is its own definition
                definitions.extend(
                    p.segment
                        .captures_iter(&text)
                        .map(|s| s[1].trim().to_string())
                        .filter(|s| !s.is_empty())
                        .map(|s| escape(&s)),
                );
                continue;
            }

            let text = text.trim();
            if text.is_empty() {
                pair_with_pos = true;
                continue;
            }

            let mut definition = String::new();
            if pair_with_pos {
                if let Some(pos) = parts_of_speech.next() {
                    definition.push_str(&format!("<span class=\"pos\">{}</span> ", escape(&pos)));
                }
            }
            definition.push_str(&escape(text));
            definitions.push(definition);
            pair_with_pos = false;
        }

        Entry {
            phonetics,
            definitions,
        }
    }

    /// Whether nothing renderable was found.
    pub fn is_empty(&self) -> bool {
        self.phonetics.is_empty() && self.definitions.is_empty()
    }

    /// Render as a `<div class="powerword-entry">` block.
    pub fn render(&self) -> String {
        let mut lines = vec!["<div class=\"powerword-entry\">".to_string()];
        if !self.phonetics.is_empty() {
            lines.push(format!(
                "<span class=\"phonetic\">{}</span>",
                self.phonetics
                    .iter()
                    .map(|p| format!("[{}]", escape(p)))
                    .join(" ")
            ));
        }
        lines.extend(
            self.definitions
                .iter()
                .map(|d| format!("<p class=\"definition\">{d}</p>")),
        );
        lines.push("</div>".to_string());
        lines.join("\n")
    }
}

/// Parse every `<JS>` block of a PowerWord record.
///
/// Data without any `<JS>` block is treated as a single block.
pub fn parse(text: &str) -> Vec<Entry> {
    let entries = patterns()
        .entry
        .captures_iter(text)
        .map(|c| Entry::parse(&c[1]))
        .collect::<Vec<_>>();

    if entries.is_empty() {
        let entry = Entry::parse(text);
        if !entry.is_empty() {
            return vec![entry];
        }
    }
    entries
}

/// Decoder for `k` chunks.
pub fn decode(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    let entries = parse(&text);
    if entries.is_empty() {
        debug!("no powerword blocks found, rendering as plain text");
        return plain_text(&text);
    }
    entries.iter().map(Entry::render).join("\n")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{decode, parse, Entry};

    #[test]
    fn english_chinese_entry() {
        let input = "<JS>\n<CY>\n<CX>\n<YX><![CDATA[apple]]></YX>\n<YB>\n<CB><![CDATA[ˈæpl]]></CB>\n</YB>\n<YB>\n</YB>\n<DX><![CDATA[n.]]></DX>\n<JX><![CDATA[苹果; 苹果树]]></JX>\n</CX>\n</CY>\n</JS>";

        assert_eq!(
            decode(input.as_bytes()),
            "<div class=\"powerword-entry\">\n<span class=\"phonetic\">[ˈæpl]</span>\n<p class=\"definition\"><span class=\"pos\">n.</span> 苹果; 苹果树</p>\n</div>"
        );
    }

    #[test]
    fn inline_fixture_without_cdata() {
        let output = decode(
            "<JS><CY><CX><YX>apple</YX><YB><CB>ˈæpl</CB></YB><DX>n.</DX><JX>苹果; 苹果树</JX></CX></CY></JS>"
                .as_bytes(),
        );
        assert!(output.contains("[ˈæpl]"));
        assert!(output.contains("<span class=\"pos\">n.</span>"));
        assert!(output.contains("苹果; 苹果树"));
    }

    #[test]
    fn part_of_speech_pairs_with_first_definition_only() {
        let input = "<JS><CY><CX><YB><CB><![CDATA[rʌn]]></CB></YB><DX><![CDATA[vt. & vi.]]></DX><JX><![CDATA[跑；移动]]></JX><JX><![CDATA[跑, 奔跑]]></JX><JX><![CDATA[旅行, 旅程]]></JX></CX></CY></JS>";

        let entries = parse(input);
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].definitions,
            vec![
                "<span class=\"pos\">vt. &amp; vi.</span> 跑；移动".to_string(),
                "跑, 奔跑".to_string(),
                "旅行, 旅程".to_string(),
            ]
        );
    }

    #[test]
    fn empty_definition_resets_pairing() {
        let input = "<JS><DX>n.</DX><DX>v.</DX><JX>one</JX><JX></JX><JX>two</JX><JX>three</JX></JS>";
        assert_eq!(
            parse(input)[0].definitions,
            vec![
                "<span class=\"pos\">n.</span> one".to_string(),
                "<span class=\"pos\">v.</span> two".to_string(),
                "three".to_string(),
            ]
        );
    }

    #[test]
    fn chinese_english_segments() {
        let input = "<JS><CY><CX><YX><![CDATA[香]]></YX><YB><PY><![CDATA[xiāng]]></PY></YB><JX><![CDATA[&L{aromatic}&L{fragrant}&L{savory}]]></JX></CX></CY></JS>";

        let output = decode(input.as_bytes());
        assert_eq!(
            output,
            "<div class=\"powerword-entry\">\n<span class=\"phonetic\">[xiāng]</span>\n<p class=\"definition\">aromatic</p>\n<p class=\"definition\">fragrant</p>\n<p class=\"definition\">savory</p>\n</div>"
        );
        assert!(!output.contains("&L{"));
    }

    #[test]
    fn pinyin_wrapper_is_unwrapped() {
        let input = "<JS><YB><PY><![CDATA[&x{yīchuànxiāngjiāo}]]></PY></YB><JX><![CDATA[&L{a hand of bananas}&L{}]]></JX></JS>";
        let entries = parse(input);
        assert_eq!(
            entries,
            vec![Entry {
                phonetics: vec!["yīchuànxiāngjiāo".to_string()],
                definitions: vec!["a hand of bananas".to_string()],
            }]
        );
    }

    #[test]
    fn phonetics_keep_encounter_order() {
        let input = "<JS><YB><PY>pīn</PY><CB>pin</CB></YB><YB><CB>pɪn</CB></YB></JS>";
        assert_eq!(parse(input)[0].phonetics, vec!["pīn", "pin", "pɪn"]);
    }

    #[test]
    fn multiple_blocks() {
        let input = "<JS><JX>苹果</JX></JS>\n<JS><JX>香蕉</JX></JS>";
        let output = decode(input.as_bytes());
        assert_eq!(output.matches("<div class=\"powerword-entry\">").count(), 2);
        assert!(output.find("苹果") < output.find("香蕉"));
    }

    #[test]
    fn missing_phonetics_and_empty_definitions() {
        let output = decode("<JS><YB><CB>test</CB></YB><JX><![CDATA[]]></JX></JS>".as_bytes());
        assert_eq!(
            output,
            "<div class=\"powerword-entry\">\n<span class=\"phonetic\">[test]</span>\n</div>"
        );

        let output = decode("<JS><DX>n.</DX><JX>definition</JX></JS>".as_bytes());
        assert!(!output.contains("phonetic"));
        assert!(output.contains("definition"));
    }

    #[test]
    fn text_is_escaped() {
        let output = decode("<JS><JX><![CDATA[a <b> & c]]></JX></JS>".as_bytes());
        assert!(output.contains("a &lt;b&gt; &amp; c"));
    }

    #[test]
    fn entities_outside_cdata_are_not_escaped_twice() {
        let entries = parse("<JS><DX>n.</DX><JX>a &amp; b &lt;c&gt;</JX><JX><![CDATA[x &amp; y]]></JX></JS>");
        assert_eq!(
            entries[0].definitions,
            vec![
                "<span class=\"pos\">n.</span> a &amp; b &lt;c&gt;".to_string(),
                "x &amp;amp; y".to_string(),
            ]
        );
    }

    #[test]
    fn unstructured_data_falls_back_to_plain_text() {
        assert_eq!(
            decode(b"just words"),
            "<p class=\"plaintext\">just words</p>"
        );
    }
}
