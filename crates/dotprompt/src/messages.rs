//! Message splitter: cuts a rendered prompt into role-tagged spans at role
//! markers, then hands each span to the part builder.

use chat_core::{Message, Role};

use crate::marker::{decode_role, ROLE_REGEX};
use crate::parts::build_parts;

/// A role and the raw text attributed to it, before part building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSource {
    pub role: Role,
    pub source: String,
}

/// Partition `rendered` at role markers.
///
/// Text before the first marker belongs to `user`. Whitespace-only spans are
/// dropped, so consecutive markers never yield an empty message; the last
/// marker before a content span decides its role. Every returned source is
/// non-empty.
pub fn split_messages(rendered: &str) -> Vec<MessageSource> {
    let mut sources = Vec::new();
    let mut current = MessageSource::default();
    let mut cursor = 0;

    for marker in ROLE_REGEX.find_iter(rendered) {
        append_span(&mut current.source, &rendered[cursor..marker.start()]);
        if !current.source.is_empty() {
            sources.push(std::mem::take(&mut current));
        }
        current.role = Role::from(decode_role(marker.as_str()));
        cursor = marker.end();
    }

    append_span(&mut current.source, &rendered[cursor..]);
    if !current.source.is_empty() {
        sources.push(current);
    }
    sources
}

fn append_span(source: &mut String, span: &str) {
    if !span.trim().is_empty() {
        source.push_str(span);
    }
}

/// Decompose a rendered prompt into messages.
///
/// Each source holds non-whitespace text, so every message has at least one
/// part.
pub fn to_messages(rendered: &str) -> Vec<Message> {
    split_messages(rendered)
        .into_iter()
        .map(|source| Message::new(source.role, build_parts(&source.source)))
        .collect()
}
