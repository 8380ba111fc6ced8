use pretty_assertions::assert_eq;
use std::path::PathBuf;

use dictconv_stardict::error::{Error, Result};
use dictconv_stardict::{StarDict, StarDictFiles};
use tracing_test::traced_test;

fn resource(path: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/resources/{}",
        env!("CARGO_MANIFEST_DIR"),
        path
    ))
}

#[traced_test]
#[test]
fn decode_plain_dictionary() -> Result<()> {
    let files = StarDictFiles::from_ifo(resource("plain/plain.ifo"))?;
    assert_eq!(files.dict, resource("plain/plain.dict"));
    assert_eq!(files.resource, Some(resource("plain/res")));

    let dict = StarDict::open(&files)?;
    assert_eq!(dict.metadata().book_name(), Some("Plain Fruit"));
    assert_eq!(dict.metadata().same_type_sequence(), Some("m"));
    assert!(logs_contain("resource files are not supported"));

    let entries = dict.entries();
    assert_eq!(
        entries.iter().map(|e| e.headword.as_str()).collect::<Vec<_>>(),
        vec!["apple", "banana", "cherry"]
    );
    assert_eq!(
        entries[0].body,
        "<p class=\"plaintext\">A round fruit.</p>\n<p class=\"plaintext\">Grows on trees &amp; bushes.</p>"
    );
    assert_eq!(
        entries[1].body,
        "<p class=\"plaintext\">A long &lt;yellow&gt; fruit.</p>"
    );
    assert_eq!(
        entries[2].body,
        "<p class=\"plaintext\">Small stone fruit.</p>\n<p class=\"plaintext\">Often red.</p>"
    );

    Ok(())
}

#[test]
fn decode_compressed_mixed_types() -> Result<()> {
    let files = StarDictFiles::from_ifo(resource("mixed/mixed.ifo"))?;
    assert_eq!(files.dict, resource("mixed/mixed.dict.dz"));

    let dict = StarDict::open(&files)?;
    let entries = dict.entries();
    assert_eq!(entries.len(), 4);

    assert_eq!(entries[0].headword, "智");
    assert_eq!(
        entries[0].body,
        "<ruby>智<rt>zhì</rt></ruby><br/>wisdom"
    );

    assert_eq!(
        entries[1].body,
        "<span class=\"tr\">[kæt]</span> <span class=\"dtrn\">a small animal</span>\n<p class=\"plaintext\">domestic</p>"
    );

    let chunks = dict.chunks(2).unwrap_or_default();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].tag, b'W');
    assert_eq!(chunks[0].data, b"RIF");
    assert_eq!(
        entries[2].body,
        "<p class=\"unsupported\">Media file is not supported.</p>\n<p class=\"plaintext\">after media</p>"
    );

    assert_eq!(
        entries[3].body,
        "<p class=\"unsupported\">Resource file is not supported.</p>\n<pre>pango <b>text</b></pre>"
    );

    Ok(())
}

#[test]
fn decode_powerword() -> Result<()> {
    let dict = StarDict::open(&StarDictFiles::from_ifo(resource(
        "powerword/powerword.ifo",
    ))?)?;

    let apple = dict.entry(0).unwrap_or_default();
    assert!(apple.body.contains("[ˈæpl]"));
    assert!(apple.body.contains("<span class=\"pos\">n.</span> 苹果; 苹果树"));

    let fragrant = dict.entry(1).unwrap_or_default();
    assert_eq!(fragrant.headword, "香");
    assert!(fragrant.body.contains("<span class=\"phonetic\">[xiāng]</span>"));
    assert_eq!(fragrant.body.matches("<p class=\"definition\">").count(), 3);
    for word in ["aromatic", "fragrant", "savory"] {
        assert!(fragrant
            .body
            .contains(&format!("<p class=\"definition\">{word}</p>")));
    }
    assert!(!fragrant.body.contains("&L{"));

    Ok(())
}

#[traced_test]
#[test]
fn size_mismatches_degrade() -> Result<()> {
    let dict = StarDict::open(&StarDictFiles::from_ifo(resource(
        "mismatch/mismatch.ifo",
    ))?)?;
    assert!(logs_contain("index file size doesn't match idxfilesize"));

    let entries = dict.entries();
    assert_eq!(entries[0].body, "<p class=\"plaintext\">one</p>");
    assert_eq!(entries[1].body, "<p class=\"plaintext\">netwo</p>");
    assert!(logs_contain("record runs past the end of the payload"));

    Ok(())
}

#[test]
fn wide_offsets_are_rejected() {
    let result = StarDictFiles::from_ifo(resource("offset64/offset64.ifo"))
        .and_then(|files| StarDict::open(&files));
    assert!(matches!(result, Err(Error::UnsupportedOffsetBits(64))));
}

#[test]
fn builder_files_open() -> Result<()> {
    let files = StarDictFiles::builder()
        .ifo(resource("plain/plain.ifo"))
        .idx(resource("plain/plain.idx"))
        .dict(resource("plain/plain.dict"))
        .build();

    let dict = StarDict::open(&files)?;
    assert_eq!(dict.len(), 3);
    assert_eq!(dict.index()[2].headword, "cherry");

    Ok(())
}
