//! Message module - Message content types
//!
//! Shared message types used across the system.

mod content;
mod role;

pub use content::{MessageContent, Part};
pub use role::Role;

use serde::{Deserialize, Serialize};

/// A single conversational message: a role and its ordered content parts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Part>,
}

impl Message {
    pub fn new(role: Role, content: Vec<Part>) -> Self {
        Self { role, content }
    }

    /// Create a message holding a single text part
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![Part::text(text)],
        }
    }
}
