use thiserror::Error;

/// Error types for prompt parsing, rendering and loading
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Template syntax error: {0}")]
    TemplateSyntax(#[from] handlebars::TemplateError),

    #[error("Template execution failed: {0}")]
    TemplateExecution(#[from] handlebars::RenderError),

    #[error("RenderText: multi-message prompt can't be rendered as text ({0} messages)")]
    MultiMessage(usize),

    #[error("RenderText: multi-modal prompt can't be rendered as text")]
    MultiModal,

    #[error("Invalid variables: {0}")]
    InvalidVariables(String),

    #[error("Frontmatter error: {0}")]
    Frontmatter(String),

    #[error("Prompt not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<serde_yaml::Error> for PromptError {
    fn from(error: serde_yaml::Error) -> Self {
        PromptError::Frontmatter(error.to_string())
    }
}

/// Result type for prompt operations
pub type PromptResult<T> = Result<T, PromptError>;
