//! Part - Message content types
//!
//! Defines the kinds of content that can appear in a rendered message.

use serde::{Deserialize, Serialize};

/// A part of message content (text or a media reference)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Text content
    Text { text: String },

    /// Media reference
    Media {
        /// MIME type, empty when the template did not declare one
        content_type: String,
        /// Location of the media
        url: String,
    },
}

impl Part {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a media content part
    pub fn media(content_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Media {
            content_type: content_type.into(),
            url: url.into(),
        }
    }

    /// Get text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}

/// Container for message content parts
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageContent {
    pub parts: Vec<Part>,
}

impl MessageContent {
    /// Get all text content concatenated
    pub fn as_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Text content, or `None` if any part is not plain text
    pub fn plain_text(&self) -> Option<String> {
        if self.parts.iter().all(Part::is_text) {
            Some(self.as_text())
        } else {
            None
        }
    }
}

impl From<Vec<Part>> for MessageContent {
    fn from(parts: Vec<Part>) -> Self {
        Self { parts }
    }
}
