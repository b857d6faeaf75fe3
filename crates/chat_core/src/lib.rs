//! chat_core - Core message types for rendered prompts
//!
//! This crate provides the conversational values produced by prompt rendering:
//! - `Role` - the participant a message belongs to
//! - `Part` - one unit of message content (text or a media reference)
//! - `Message` - a role plus its ordered parts

pub mod message;

// Re-export commonly used types
pub use message::{Message, MessageContent, Part, Role};
