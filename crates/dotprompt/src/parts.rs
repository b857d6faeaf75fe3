//! Part builder: cuts one message span into text and media parts at media
//! markers.

use chat_core::Part;

use crate::marker::{decode_media, MEDIA_REGEX};

/// Partition a message span into parts.
///
/// A text gap in front of a marker is emitted only if it holds something
/// besides whitespace, and then untrimmed. Text after the last marker is
/// emitted whenever it is non-empty, whitespace or not.
pub fn build_parts(source: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut cursor = 0;

    for marker in MEDIA_REGEX.find_iter(source) {
        let gap = &source[cursor..marker.start()];
        if !gap.trim().is_empty() {
            parts.push(Part::text(gap));
        }

        let (url, content_type) = decode_media(marker.as_str());
        parts.push(Part::media(content_type, url));
        cursor = marker.end();
    }

    if cursor < source.len() {
        parts.push(Part::text(&source[cursor..]));
    }
    parts
}
