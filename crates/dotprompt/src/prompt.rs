//! A parsed prompt document and its render entry points.

use chat_core::{Message, MessageContent, Part};
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{PromptError, PromptResult};
use crate::frontmatter::{parse_document, Frontmatter};
use crate::messages::to_messages;
use crate::template::Template;

/// Options applied when compiling a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    /// Fail on references to undefined variables (default: true)
    pub strict: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Caller-side overrides for [`Prompt::render`]
#[derive(Debug, Clone, Default)]
pub struct RenderOverrides {
    pub model: Option<String>,
    /// Merged over the front matter `config`, these keys win
    pub config: Option<Map<String, Value>>,
}

/// Everything needed to call a model with a rendered prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPrompt {
    pub model: Option<String>,
    pub config: Map<String, Value>,
    pub messages: Vec<Message>,
}

impl RenderedPrompt {
    /// All messages but the last
    pub fn history(&self) -> &[Message] {
        self.messages
            .split_last()
            .map(|(_, history)| history)
            .unwrap_or(&[])
    }

    /// Content of the last message
    pub fn prompt(&self) -> &[Part] {
        self.messages
            .last()
            .map(|message| message.content.as_slice())
            .unwrap_or(&[])
    }
}

/// A compiled `.prompt` document.
#[derive(Debug)]
pub struct Prompt {
    name: String,
    variant: Option<String>,
    frontmatter: Frontmatter,
    template: Template,
}

impl Prompt {
    /// Parse a document with default options.
    pub fn parse(name: impl Into<String>, document: &str) -> PromptResult<Self> {
        Self::parse_with(name, document, PromptOptions::default())
    }

    pub fn parse_with(
        name: impl Into<String>,
        document: &str,
        options: PromptOptions,
    ) -> PromptResult<Self> {
        let (frontmatter, body) = parse_document(document)?;
        let template = Template::compile_with(body, options.strict)?;
        Ok(Self {
            name: name.into(),
            variant: frontmatter.variant.clone(),
            frontmatter,
            template,
        })
    }

    /// Replace the variant, including the one declared in front matter.
    /// `None` clears it.
    pub fn with_variant(mut self, variant: Option<String>) -> Self {
        self.variant = variant;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    /// Render into messages.
    ///
    /// `variables` must serialize to a JSON object (or null for none). They
    /// are layered over the front matter `input.default` values.
    pub fn render_messages<T: Serialize + ?Sized>(
        &self,
        variables: &T,
    ) -> PromptResult<Vec<Message>> {
        let variables = self.merge_variables(variables)?;
        let rendered = self.template.exec(&variables)?;
        let messages = to_messages(&rendered);
        debug!(
            "Rendered prompt '{}' into {} message(s)",
            self.name,
            messages.len()
        );
        Ok(messages)
    }

    /// Render into a single plain string.
    ///
    /// Fails with `MultiMessage` unless exactly one message results and with
    /// `MultiModal` if that message has a non-text part.
    pub fn render_text<T: Serialize + ?Sized>(&self, variables: &T) -> PromptResult<String> {
        let mut messages = self.render_messages(variables)?;
        if messages.len() != 1 {
            return Err(PromptError::MultiMessage(messages.len()));
        }
        let message = messages.remove(0);
        MessageContent::from(message.content)
            .plain_text()
            .ok_or(PromptError::MultiModal)
    }

    /// Render into a model request: messages plus resolved model and config.
    pub fn render<T: Serialize + ?Sized>(
        &self,
        variables: &T,
        overrides: &RenderOverrides,
    ) -> PromptResult<RenderedPrompt> {
        let messages = self.render_messages(variables)?;

        let mut config = self.frontmatter.config.clone().unwrap_or_default();
        if let Some(extra) = &overrides.config {
            config.extend(extra.clone());
        }

        Ok(RenderedPrompt {
            model: overrides
                .model
                .clone()
                .or_else(|| self.frontmatter.model.clone()),
            config,
            messages,
        })
    }

    fn merge_variables<T: Serialize + ?Sized>(&self, variables: &T) -> PromptResult<Value> {
        let mut merged = self
            .frontmatter
            .default_variables()
            .cloned()
            .unwrap_or_default();

        match serde_json::to_value(variables)? {
            Value::Object(provided) => merged.extend(provided),
            Value::Null => {}
            other => {
                return Err(PromptError::InvalidVariables(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )))
            }
        }
        Ok(Value::Object(merged))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
