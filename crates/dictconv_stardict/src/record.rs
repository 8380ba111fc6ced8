//! Splitting payload records into typed chunks.
//!
//! A record is a run of chunks. How chunk boundaries are found depends on whether the
//! `.ifo` declares a `sametypesequence`:
//!
//! - **Self-describing**: every chunk starts with its type tag. Lowercase (text) and `r`
//!   chunks end at a null byte. Sized media chunks (`W`, `P`, `X`) carry a 4 byte big
//!   endian length before the body and are followed by one padding byte.
//! - **Declared sequence**: the tags come from the metadata and are not repeated in the
//!   record. Text and `r` chunks end at a null byte, except that a sequence of exactly one
//!   text tag takes the whole record. Sized media chunks carry a length prefix, except the
//!   last one in the sequence which has no prefix and takes everything that is left.
//!
//! All scans are bounded by the record, a length prefix that overshoots yields a
//! truncated chunk instead of an error.

use dictconv_markup::Dialect;
use tracing::warn;

use crate::cursor::ByteCursor;
use crate::types::Chunk;

fn take_sized(cursor: ByteCursor<'_>) -> (&[u8], ByteCursor<'_>) {
    let (len, cursor) = cursor.read_u32();
    let Some(len) = len else {
        warn!("media chunk length is truncated");
        return (&[], cursor);
    };

    let (data, cursor) = cursor.take(len as usize);
    if data.len() < len as usize {
        warn!(declared = len, available = data.len(), "media chunk is truncated");
    }
    (data, cursor)
}

/// Split a record whose chunks carry their own type tags.
pub fn split_self_describing(record: &[u8]) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut cursor = ByteCursor::new(record);

    while let (Some(tag), next) = cursor.read_u8() {
        let (data, next) = if Dialect::from_tag(tag).is_sized() {
            let (data, next) = take_sized(next);
            (data, next.skip(1))
        } else {
            next.take_until_nul()
        };

        chunks.push(Chunk::new(tag, data));
        cursor = next;
    }

    chunks
}

/// Split a record using the type tags declared for the whole dictionary.
///
/// Yields exactly one chunk per tag.
pub fn split_declared<'a>(record: &'a [u8], sequence: &[u8]) -> Vec<Chunk<'a>> {
    let mut cursor = ByteCursor::new(record);

    sequence
        .iter()
        .enumerate()
        .map(|(i, &tag)| {
            let is_last = i + 1 == sequence.len();
            let (data, next) = match Dialect::from_tag(tag) {
                Dialect::Media if is_last => cursor.take_rest(),
                Dialect::Media => take_sized(cursor),
                Dialect::Resource => cursor.take_until_nul(),
                _ if sequence.len() == 1 => cursor.take_rest(),
                _ => cursor.take_until_nul(),
            };
            cursor = next;
            Chunk::new(tag, data)
        })
        .collect()
}

/// Split a record, selecting the algorithm by the declared type sequence.
pub fn split<'a>(record: &'a [u8], sequence: Option<&str>) -> Vec<Chunk<'a>> {
    match sequence.map(str::as_bytes).filter(|s| !s.is_empty()) {
        Some(sequence) => split_declared(record, sequence),
        None => split_self_describing(record),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::{split, split_declared, split_self_describing};
    use crate::types::Chunk;

    #[test]
    fn single_field_takes_whole_record() {
        let record = b"<JS><JX>apple\0</JX></JS>\0";
        let chunks = split(record, Some("k"));
        assert_eq!(chunks, vec![Chunk::new(b'k', record)]);
    }

    #[test]
    fn two_text_fields() {
        let chunks = split(b"definition 1\0definition 2\0", Some("mm"));
        assert_eq!(
            chunks,
            vec![
                Chunk::new(b'm', b"definition 1"),
                Chunk::new(b'm', b"definition 2"),
            ]
        );
    }

    #[test]
    fn last_text_field_without_terminator() {
        let chunks = split(b"phonetic\0meaning", Some("tm"));
        assert_eq!(
            chunks,
            vec![Chunk::new(b't', b"phonetic"), Chunk::new(b'm', b"meaning")]
        );
    }

    #[test]
    fn declared_media_not_last_uses_length() {
        #[rustfmt::skip]
        let record = [
            0x00, 0x00, 0x00, 0x03,
            0xAA, 0xBB, 0xCC,
            b't', b'e', b'x', b't',
        ];

        let chunks = split_declared(&record, b"Wm");
        assert_eq!(
            chunks,
            vec![Chunk::new(b'W', &[0xAA, 0xBB, 0xCC]), Chunk::new(b'm', b"text")]
        );
    }

    #[test]
    fn declared_media_last_takes_rest() {
        #[rustfmt::skip]
        let record = [
            b'a', 0x00,
            0x01, 0x02, 0x03, 0x04, 0x05,
        ];

        let chunks = split_declared(&record, b"mP");
        assert_eq!(
            chunks,
            vec![
                Chunk::new(b'm', b"a"),
                Chunk::new(b'P', &[0x01, 0x02, 0x03, 0x04, 0x05]),
            ]
        );

        let chunks = split_declared(&[b'W', 0x00, 0x00, 0x00, 0x00], b"W");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].data.len(), 5);
    }

    #[test]
    fn declared_resource() {
        let chunks = split_declared(b"img.png\0text", b"rm");
        assert_eq!(
            chunks,
            vec![Chunk::new(b'r', b"img.png"), Chunk::new(b'm', b"text")]
        );
    }

    #[test]
    fn declared_sequence_on_exhausted_record() {
        let chunks = split_declared(b"only\0", b"mmh");
        assert_eq!(
            chunks,
            vec![
                Chunk::new(b'm', b"only"),
                Chunk::new(b'm', b""),
                Chunk::new(b'h', b""),
            ]
        );
    }

    #[test]
    fn self_describing_text() {
        let chunks = split(b"mtest definition\0hhtml <b>x</b>\0", None);
        assert_eq!(
            chunks,
            vec![
                Chunk::new(b'm', b"test definition"),
                Chunk::new(b'h', b"html <b>x</b>"),
            ]
        );
    }

    #[test]
    fn self_describing_last_chunk_without_terminator() {
        let chunks = split(b"mfirst\0gsecond", Some(""));
        assert_eq!(
            chunks,
            vec![Chunk::new(b'm', b"first"), Chunk::new(b'g', b"second")]
        );
    }

    #[test]
    fn self_describing_media_skips_padding() {
        #[rustfmt::skip]
        let record = [
            b'W', 0x00, 0x00, 0x00, 0x02, 0x52, 0x49, 0x00,
            b'r', b'a', b'.', b'p', b'n', b'g', 0x00,
            b'm', b'x',
        ];

        let chunks = split_self_describing(&record);
        assert_eq!(
            chunks,
            vec![
                Chunk::new(b'W', &[0x52, 0x49]),
                Chunk::new(b'r', b"a.png"),
                Chunk::new(b'm', b"x"),
            ]
        );
    }

    #[traced_test]
    #[test]
    fn overlong_media_is_clamped() {
        #[rustfmt::skip]
        let record = [
            b'X', 0x00, 0x00, 0x10, 0x00, 0x01, 0x02,
        ];

        let chunks = split_self_describing(&record);
        assert_eq!(chunks, vec![Chunk::new(b'X', &[0x01, 0x02])]);
        assert!(logs_contain("media chunk is truncated"));

        let chunks = split_declared(&[0x00, 0x00], b"Wm");
        assert_eq!(chunks, vec![Chunk::new(b'W', &[]), Chunk::new(b'm', &[])]);
        assert!(logs_contain("media chunk length is truncated"));
    }

    #[test]
    fn empty_record() {
        assert!(split(&[], None).is_empty());
        assert_eq!(split(&[], Some("m")), vec![Chunk::new(b'm', &[])]);
    }
}
