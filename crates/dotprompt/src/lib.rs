//! dotprompt - render `.prompt` templates into conversational messages
//!
//! A prompt document is optional YAML front matter followed by a Handlebars
//! template. Rendering runs the template, then recovers structure from the
//! flat output:
//! - `marker` - the reserved tokens written by the `role` and `media` helpers
//! - `helpers` - `json`, `role` and `media`
//! - `messages` - splits rendered text into role-tagged spans
//! - `parts` - splits one span into text and media parts
//! - `prompt` - `Prompt::render_messages`, `render_text`, `render`
//! - `store` - directory-backed loading with variants and caching

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod helpers;
pub mod marker;
pub mod messages;
pub mod parts;
pub mod prompt;
pub mod store;
pub mod template;

pub use chat_core::{Message, MessageContent, Part, Role};
pub use config::{PromptStoreConfig, PROMPT_DIR_ENV};
pub use error::{PromptError, PromptResult};
pub use frontmatter::{Frontmatter, InputConfig, OutputConfig};
pub use helpers::{JsonOptions, MediaOptions};
pub use messages::{split_messages, to_messages, MessageSource};
pub use parts::build_parts;
pub use prompt::{Prompt, PromptOptions, RenderOverrides, RenderedPrompt};
pub use store::{PromptKey, PromptStore};
pub use template::Template;
