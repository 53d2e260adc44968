//! Utilities for recognizing search index payloads without parsing them.

use memchr::memmem;

use crate::consts;

/// How much of a payload [`looks_like_index`] inspects.
pub const HEADER_SNIFF_BYTES: usize = 256;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Truncates raw bytes to at most `max_bytes`, backing off so the cut never
/// lands inside a multi-byte UTF-8 sequence.
///
/// Accepts raw bytes, instead of requiring valid UTF-8: continuation bytes
/// (`0b10xx_xxxx`) are recognizable on their own, so no decoding is needed.
///
/// # Examples
///
/// ```rust
/// use docsift_index::safe_utf8_truncate;
/// let text = "affine – map".as_bytes();
/// // The en dash is three bytes long, starting at offset 7
/// assert_eq!(safe_utf8_truncate(text, 8), b"affine ");
/// assert_eq!(safe_utf8_truncate(text, 100), text);
/// ```
pub fn safe_utf8_truncate(bytes: &[u8], max_bytes: usize) -> &[u8] {
    if bytes.len() <= max_bytes {
        return bytes;
    }
    let mut end = max_bytes;
    // A UTF-8 sequence is at most four bytes long, so at most three
    // continuation bytes need to be stepped over.
    while end > 0 && end + 3 >= max_bytes && is_continuation(bytes[end]) {
        end -= 1;
    }
    &bytes[..end]
}

fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Splits a JavaScript assignment into the assigned variable and its value.
///
/// A leading byte order mark and surrounding whitespace are ignored, as is a
/// trailing `;`. Payloads that are plain JSON (no assignment) return `None`
/// for the variable and the trimmed payload as the value.
///
/// # Examples
///
/// ```rust
/// use docsift_index::split_assignment;
/// let (variable, body) = split_assignment("var documenterSearchIndex = {\"docs\":\n[]\n};\n");
/// assert_eq!(variable, Some("documenterSearchIndex"));
/// assert_eq!(body, "{\"docs\":\n[]\n}");
/// assert_eq!(split_assignment(" {\"docs\":[]} "), (None, "{\"docs\":[]}"));
/// ```
pub fn split_assignment(text: &str) -> (Option<&str>, &str) {
    let text = text.trim_start_matches(BYTE_ORDER_MARK);
    let (variable, body) = match consts::ASSIGNMENT_REGEX.captures(text) {
        Some(captures) => {
            // Group 0 always exists on a match; group 1 is not optional.
            let whole = captures.get(0).map_or(0, |m| m.end());
            (captures.get(1).map(|m| m.as_str()), &text[whole..])
        },
        None => (None, text),
    };
    let body = body.trim();
    let body = body.strip_suffix(';').map_or(body, str::trim_end);
    (variable, body)
}

/// Returns `true` if the payload appears to be a search index.
///
/// Only the first [`HEADER_SNIFF_BYTES`] bytes are examined; a `true` result
/// does not guarantee the rest of the payload parses.
pub fn looks_like_index(bytes: &[u8]) -> bool {
    let head = safe_utf8_truncate(bytes, HEADER_SNIFF_BYTES);
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let (_, body) = split_assignment(text);
    if consts::DOCS_OBJECT_REGEX.is_match(body) {
        return true;
    }
    // The key doesn't have to come first, as long as the value is an object.
    body.starts_with('{') && memmem::find(body.as_bytes(), b"\"docs\"").is_some()
}
