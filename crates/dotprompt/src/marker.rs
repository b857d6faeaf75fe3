//! Marker protocol shared by the template helpers and the splitters.
//!
//! Helpers cannot return structure to the caller, only text, so role switches
//! and media references travel through the rendered string as reserved
//! tokens:
//!
//! - role: `<<<dotprompt:role:NAME>>>` where `NAME` is `[a-z]+`
//! - media: `<<<dotprompt:media:url URL[ CONTENT_TYPE]>>>`
//!
//! There is no escaping. Literal template text that matches one of these
//! shapes is read as a directive.

use once_cell::sync::Lazy;
use regex::Regex;

pub const ROLE_PREFIX: &str = "<<<dotprompt:role:";
pub const ROLE_SUFFIX: &str = ">>>";
pub const MEDIA_PREFIX: &str = "<<<dotprompt:media:url";
pub const MEDIA_SUFFIX: &str = ">>>";

pub(crate) static ROLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "{}[a-z]+{}",
        regex::escape(ROLE_PREFIX),
        regex::escape(ROLE_SUFFIX)
    ))
    .expect("role marker pattern is valid")
});

pub(crate) static MEDIA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "{}.*?{}",
        regex::escape(MEDIA_PREFIX),
        regex::escape(MEDIA_SUFFIX)
    ))
    .expect("media marker pattern is valid")
});

/// Whether `name` can be carried by a role marker.
pub fn is_valid_role_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase())
}

/// Encode a role switch.
pub fn role_marker(role: &str) -> String {
    format!("{ROLE_PREFIX}{role}{ROLE_SUFFIX}")
}

/// Encode a media reference. An empty content type is omitted.
pub fn media_marker(url: &str, content_type: Option<&str>) -> String {
    match content_type.filter(|ct| !ct.is_empty()) {
        Some(ct) => format!("{MEDIA_PREFIX} {url} {ct}{MEDIA_SUFFIX}"),
        None => format!("{MEDIA_PREFIX} {url}{MEDIA_SUFFIX}"),
    }
}

/// Role name carried by a matched role marker.
pub(crate) fn decode_role(marker: &str) -> &str {
    &marker[ROLE_PREFIX.len()..marker.len() - ROLE_SUFFIX.len()]
}

/// `(url, content_type)` carried by a matched media marker.
///
/// One separating space after the prefix is dropped, then the payload is cut
/// at its first space. The content type is empty when absent.
pub(crate) fn decode_media(marker: &str) -> (&str, &str) {
    let payload = &marker[MEDIA_PREFIX.len()..marker.len() - MEDIA_SUFFIX.len()];
    let payload = payload.strip_prefix(' ').unwrap_or(payload);
    payload.split_once(' ').unwrap_or((payload, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_marker_round_trips() {
        let marker = role_marker("system");
        assert_eq!(marker, "<<<dotprompt:role:system>>>");
        assert!(ROLE_REGEX.is_match(&marker));
        assert_eq!(decode_role(&marker), "system");
    }

    #[test]
    fn role_pattern_rejects_non_lowercase_names() {
        assert!(!ROLE_REGEX.is_match("<<<dotprompt:role:System>>>"));
        assert!(!ROLE_REGEX.is_match("<<<dotprompt:role:>>>"));
        assert!(!ROLE_REGEX.is_match("<<<dotprompt:role:user1>>>"));
    }

    #[test]
    fn valid_role_names() {
        assert!(is_valid_role_name("user"));
        assert!(is_valid_role_name("critic"));
        assert!(!is_valid_role_name(""));
        assert!(!is_valid_role_name("Model"));
        assert!(!is_valid_role_name("tool_call"));
    }

    #[test]
    fn media_marker_with_content_type() {
        let marker = media_marker("https://x/img.png", Some("image/png"));
        assert_eq!(marker, "<<<dotprompt:media:url https://x/img.png image/png>>>");
        assert_eq!(decode_media(&marker), ("https://x/img.png", "image/png"));
    }

    #[test]
    fn media_marker_without_content_type() {
        let marker = media_marker("https://x/doc", Some(""));
        assert_eq!(marker, "<<<dotprompt:media:url https://x/doc>>>");
        assert_eq!(decode_media(&marker), ("https://x/doc", ""));
    }

    #[test]
    fn media_pattern_is_non_greedy() {
        let text = "<<<dotprompt:media:url a>>> mid <<<dotprompt:media:url b>>>";
        let found: Vec<_> = MEDIA_REGEX.find_iter(text).map(|m| m.as_str()).collect();
        assert_eq!(
            found,
            vec!["<<<dotprompt:media:url a>>>", "<<<dotprompt:media:url b>>>"]
        );
    }

    #[test]
    fn media_payload_splits_on_first_space_only() {
        let marker = "<<<dotprompt:media:url https://x/v.mp4 video/mp4; codecs=avc1>>>";
        assert_eq!(
            decode_media(marker),
            ("https://x/v.mp4", "video/mp4; codecs=avc1")
        );
    }
}
