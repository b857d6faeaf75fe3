use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the prompt directory
pub const PROMPT_DIR_ENV: &str = "DOTPROMPT_DIR";

const DEFAULT_PROMPT_DIR: &str = "./prompts";

/// Where the prompt store looks for `.prompt` files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptStoreConfig {
    pub prompt_dir: PathBuf,
}

impl Default for PromptStoreConfig {
    fn default() -> Self {
        Self {
            prompt_dir: PathBuf::from(DEFAULT_PROMPT_DIR),
        }
    }
}

impl PromptStoreConfig {
    pub fn new(prompt_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompt_dir: prompt_dir.into(),
        }
    }

    /// Default configuration with `DOTPROMPT_DIR` applied when set.
    pub fn from_env() -> Self {
        Self::new(resolve_prompt_dir(std::env::var_os(PROMPT_DIR_ENV)))
    }
}

fn resolve_prompt_dir(value: Option<OsString>) -> PathBuf {
    value
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_DIR))
}
