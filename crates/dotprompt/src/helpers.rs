//! Helpers available to every prompt template.
//!
//! - `{{json value indent=2}}` prints structured data
//! - `{{role "system"}}` switches the role of the following text
//! - `{{media url=imageUrl contentType="image/png"}}` inserts a media reference
//!
//! `role` and `media` only write markers (see [`crate::marker`]); the
//! splitters turn them back into structure after rendering.

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde::Serialize;
use serde_json::Value;

use crate::marker::{is_valid_role_name, media_marker, role_marker, MEDIA_SUFFIX};

/// Options of the `json` helper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    /// Spaces per nesting level; 0 prints compact JSON.
    pub indent: usize,
}

impl JsonOptions {
    /// A missing or non-integer `indent` is treated as 0.
    fn from_helper(h: &Helper) -> Self {
        let indent = h
            .hash_get("indent")
            .and_then(|value| value.value().as_u64())
            .and_then(|indent| usize::try_from(indent).ok())
            .unwrap_or(0);
        Self { indent }
    }
}

/// Options of the `media` helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaOptions {
    pub url: String,
    /// Empty strings are normalized to `None`.
    pub content_type: Option<String>,
}

impl MediaOptions {
    fn from_helper(h: &Helper) -> Result<Self, RenderErrorReason> {
        let url = h
            .hash_get("url")
            .and_then(|value| value.value().as_str())
            .ok_or_else(|| {
                RenderErrorReason::Other("media helper requires a string `url` argument".into())
            })?;
        let content_type = h
            .hash_get("contentType")
            .and_then(|value| value.value().as_str())
            .filter(|content_type| !content_type.is_empty())
            .map(str::to_string);

        let options = Self {
            url: url.to_string(),
            content_type,
        };
        options.validate()?;
        Ok(options)
    }

    /// Reject values that would produce a marker the part builder cannot
    /// read back: the url is the payload up to the first space, and neither
    /// field may span lines or contain the marker suffix.
    fn validate(&self) -> Result<(), RenderErrorReason> {
        if self.url.is_empty() {
            return Err(RenderErrorReason::Other(
                "media helper requires a non-empty `url`".into(),
            ));
        }
        if self.url.chars().any(char::is_whitespace) || self.url.contains(MEDIA_SUFFIX) {
            return Err(RenderErrorReason::Other(format!(
                "media url {:?} must not contain whitespace or {:?}",
                self.url, MEDIA_SUFFIX
            )));
        }
        if let Some(content_type) = &self.content_type {
            if content_type.contains(['\n', '\r']) || content_type.contains(MEDIA_SUFFIX) {
                return Err(RenderErrorReason::Other(format!(
                    "media contentType {:?} must not contain line breaks or {:?}",
                    content_type, MEDIA_SUFFIX
                )));
            }
        }
        Ok(())
    }
}

/// Serialize `value` as JSON text.
///
/// Formatting failures do not abort rendering: the error description becomes
/// the output instead.
pub fn format_json<T: Serialize + ?Sized>(value: &T, options: &JsonOptions) -> String {
    let result = if options.indent == 0 {
        serde_json::to_string(value)
    } else {
        to_indented_json(value, options.indent)
    };

    match result {
        Ok(text) => text,
        Err(error) => {
            log::debug!("json helper degraded to error text: {}", error);
            error.to_string()
        }
    }
}

fn to_indented_json<T: Serialize + ?Sized>(value: &T, indent: usize) -> serde_json::Result<String> {
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn json_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let options = JsonOptions::from_helper(h);
    let text = match h.param(0) {
        Some(param) => format_json(param.value(), &options),
        None => format_json(&Value::Null, &options),
    };
    out.write(&text)?;
    Ok(())
}

fn role_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let role = h
        .param(0)
        .and_then(|param| param.value().as_str())
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("role", 0))?;
    if !is_valid_role_name(role) {
        return Err(RenderErrorReason::Other(format!(
            "role helper expects a lowercase role name, got {:?}",
            role
        ))
        .into());
    }
    out.write(&role_marker(role))?;
    Ok(())
}

fn media_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let options = MediaOptions::from_helper(h)?;
    out.write(&media_marker(&options.url, options.content_type.as_deref()))?;
    Ok(())
}

/// Install `json`, `role` and `media` on a registry.
pub fn register_helpers(registry: &mut Handlebars<'_>) {
    registry.register_helper("json", Box::new(json_helper));
    registry.register_helper("role", Box::new(role_helper));
    registry.register_helper("media", Box::new(media_helper));
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn render(template: &str, data: Value) -> Result<String, handlebars::RenderError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        register_helpers(&mut registry);
        registry.render_template(template, &data)
    }

    #[test]
    fn json_compact_by_default() {
        let out = render("{{json data}}", json!({ "data": { "a": [1, 2] } })).unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn json_with_indent() {
        let out = render("{{json data indent=2}}", json!({ "data": { "a": 1 } })).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn json_output_is_not_escaped() {
        let out = render("{{json data}}", json!({ "data": "<b>" })).unwrap();
        assert_eq!(out, "\"<b>\"");
    }

    #[test]
    fn json_failure_becomes_text() {
        let mut keyed = HashMap::new();
        keyed.insert((1, 2), "pair");
        let text = format_json(&keyed, &JsonOptions::default());
        assert!(text.contains("key must be a string"), "got {text:?}");
    }

    #[test]
    fn role_emits_marker() {
        let out = render("{{role \"system\"}}Be terse.", json!({})).unwrap();
        assert_eq!(out, "<<<dotprompt:role:system>>>Be terse.");
    }

    #[test]
    fn role_accepts_unknown_lowercase_roles() {
        let out = render("{{role \"critic\"}}", json!({})).unwrap();
        assert_eq!(out, "<<<dotprompt:role:critic>>>");
    }

    #[test]
    fn role_rejects_names_that_cannot_be_markers() {
        assert!(render("{{role \"System\"}}", json!({})).is_err());
        assert!(render("{{role \"tool_call\"}}", json!({})).is_err());
    }

    #[test]
    fn media_emits_marker_with_content_type() {
        let out = render(
            "{{media url=img contentType=\"image/png\"}}",
            json!({ "img": "https://x/img.png" }),
        )
        .unwrap();
        assert_eq!(out, "<<<dotprompt:media:url https://x/img.png image/png>>>");
    }

    #[test]
    fn media_without_content_type() {
        let out = render("{{media url=\"https://x/doc\"}}", json!({})).unwrap();
        assert_eq!(out, "<<<dotprompt:media:url https://x/doc>>>");
    }

    #[test]
    fn media_requires_url() {
        assert!(render("{{media contentType=\"image/png\"}}", json!({})).is_err());
    }

    #[test]
    fn media_rejects_empty_url() {
        assert!(render("{{media url=\"\"}}", json!({})).is_err());
    }

    #[test]
    fn media_rejects_url_with_line_break() {
        let result = render("see {{media url=u}}", json!({ "u": "https://x/a\nb.png" }));
        assert!(result.is_err());
    }

    #[test]
    fn media_rejects_url_with_space() {
        let result = render(
            "{{media url=u contentType=\"image/png\"}}",
            json!({ "u": "https://x/a b.png" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn media_rejects_url_with_marker_suffix() {
        let result = render("{{media url=u}}", json!({ "u": "https://x/a>>>b.png" }));
        assert!(result.is_err());
    }

    #[test]
    fn media_rejects_content_type_with_marker_suffix() {
        let result = render(
            "{{media url=\"https://x/a.png\" contentType=t}}",
            json!({ "t": "image/png>>>" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn media_rejects_content_type_with_line_break() {
        let result = render(
            "{{media url=\"https://x/a.png\" contentType=t}}",
            json!({ "t": "image/png\nx" }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn media_content_type_may_contain_spaces() {
        let out = render(
            "{{media url=\"https://x/v.mp4\" contentType=\"video/mp4; codecs=avc1\"}}",
            json!({}),
        )
        .unwrap();
        assert_eq!(
            out,
            "<<<dotprompt:media:url https://x/v.mp4 video/mp4; codecs=avc1>>>"
        );
    }
}
