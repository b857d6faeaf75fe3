//! Thin wrapper around the Handlebars engine: one registry, one template,
//! the dotprompt helpers installed and HTML escaping disabled.

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::PromptResult;
use crate::helpers::register_helpers;

const TEMPLATE_NAME: &str = "prompt";

#[derive(Debug)]
pub struct Template {
    registry: Handlebars<'static>,
}

impl Template {
    /// Compile `source` in strict mode.
    pub fn compile(source: &str) -> PromptResult<Self> {
        Self::compile_with(source, true)
    }

    /// Compile `source`. With `strict` set, referencing an undefined variable
    /// fails the render instead of producing empty text.
    pub fn compile_with(source: &str, strict: bool) -> PromptResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(strict);
        register_helpers(&mut registry);
        registry.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self { registry })
    }

    /// Execute the template against `variables`.
    pub fn exec(&self, variables: &Value) -> PromptResult<String> {
        Ok(self.registry.render(TEMPLATE_NAME, variables)?)
    }
}
