//! YAML front matter of `.prompt` documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PromptError, PromptResult};

/// Metadata declared at the top of a prompt document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Model the prompt is written for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Generation config passed through to the model layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Tool names made available to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Frontmatter {
    /// Default variables declared under `input.default`
    pub fn default_variables(&self) -> Option<&Map<String, Value>> {
        self.input.as_ref().and_then(|input| input.default.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Declared input schema; carried along, not enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// Split a document into its raw front matter block and the template body.
///
/// A document that does not open with a `---` line has no front matter.
pub fn split_frontmatter(document: &str) -> PromptResult<(Option<&str>, &str)> {
    let Some(rest) = document
        .strip_prefix("---\n")
        .or_else(|| document.strip_prefix("---\r\n"))
    else {
        return Ok((None, document));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Ok((Some(&rest[..offset]), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(PromptError::Frontmatter(
        "Missing closing `---` for YAML frontmatter".to_string(),
    ))
}

/// Parse a document into front matter (default when absent) and template body.
pub fn parse_document(document: &str) -> PromptResult<(Frontmatter, &str)> {
    let (raw, body) = split_frontmatter(document)?;
    let frontmatter = match raw {
        Some(raw) if !raw.trim().is_empty() => serde_yaml::from_str(raw)?,
        _ => Frontmatter::default(),
    };
    Ok((frontmatter, body))
}
