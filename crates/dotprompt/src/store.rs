//! Prompt store backed by a directory of `.prompt` files, with an in-memory
//! cache of compiled prompts.
//!
//! Files are named `{name}.prompt` or `{name}.{variant}.prompt`.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::fs;
use tokio::sync::RwLock;

use crate::config::PromptStoreConfig;
use crate::error::{PromptError, PromptResult};
use crate::prompt::Prompt;

const PROMPT_EXTENSION: &str = "prompt";

/// Name and optional variant identifying a prompt
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromptKey {
    pub name: String,
    pub variant: Option<String>,
}

impl PromptKey {
    pub fn new(name: impl Into<String>, variant: Option<&str>) -> Self {
        Self {
            name: name.into(),
            variant: variant.map(str::to_string),
        }
    }

    /// Key for a file stem such as `greet` or `greet.short`
    fn from_file_stem(stem: &str) -> Self {
        match stem.split_once('.') {
            Some((name, variant)) => Self::new(name, Some(variant)),
            None => Self::new(stem, None),
        }
    }
}

impl fmt::Display for PromptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{}.{}", self.name, variant),
            None => f.write_str(&self.name),
        }
    }
}

pub fn prompt_path(prompt_dir: &Path, name: &str, variant: Option<&str>) -> PathBuf {
    let key = PromptKey::new(name, variant);
    prompt_dir.join(format!("{key}.{PROMPT_EXTENSION}"))
}

pub struct PromptStore {
    prompts: RwLock<HashMap<PromptKey, Arc<Prompt>>>,
    config: PromptStoreConfig,
}

impl PromptStore {
    pub fn new(config: PromptStoreConfig) -> Self {
        Self {
            prompts: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Return the cached prompt, loading and caching it on first use.
    pub async fn lookup(&self, name: &str, variant: Option<&str>) -> PromptResult<Arc<Prompt>> {
        let key = PromptKey::new(name, variant);
        if let Some(prompt) = self.prompts.read().await.get(&key) {
            return Ok(Arc::clone(prompt));
        }

        let prompt = Arc::new(self.load_prompt(name, variant).await?);
        let mut prompts = self.prompts.write().await;
        Ok(Arc::clone(prompts.entry(key).or_insert(prompt)))
    }

    /// Read and compile a prompt from disk, bypassing the cache.
    ///
    /// A missing variant falls back to the variant-less file.
    pub async fn load_prompt(&self, name: &str, variant: Option<&str>) -> PromptResult<Prompt> {
        let dir = &self.config.prompt_dir;
        let mut variant = variant;
        let mut path = prompt_path(dir, name, variant);

        if !fs::try_exists(&path).await? {
            if let Some(requested) = variant {
                warn!(
                    "Prompt '{}.{}' not found, trying '{}' without variant.",
                    name, requested, name
                );
                variant = None;
                path = prompt_path(dir, name, None);
            }
        }

        if !fs::try_exists(&path).await? {
            return Err(PromptError::NotFound(format!(
                "Tried to load prompt '{}.{}' but the file did not exist.",
                name, PROMPT_EXTENSION
            )));
        }

        debug!("Loading prompt from {:?}", path);
        let source = fs::read_to_string(&path).await?;
        let prompt = Prompt::parse(name, &source)?.with_variant(variant.map(str::to_string));
        Ok(prompt)
    }

    /// Keys of every `.prompt` file in the prompt directory, sorted.
    pub async fn list_prompts(&self) -> PromptResult<Vec<PromptKey>> {
        let mut entries = fs::read_dir(&self.config.prompt_dir).await?;
        let mut keys = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == PROMPT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(PromptKey::from_file_stem(stem));
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Compile every prompt in the directory into the cache.
    ///
    /// Files that fail to load are skipped with a warning. Returns the number
    /// of prompts loaded.
    pub async fn load_all(&self) -> PromptResult<usize> {
        let keys = self.list_prompts().await?;
        let mut loaded = HashMap::new();

        for key in keys {
            match self.load_prompt(&key.name, key.variant.as_deref()).await {
                Ok(prompt) => {
                    loaded.insert(key, Arc::new(prompt));
                }
                Err(error) => {
                    warn!("Failed to load prompt {}: {}", key, error);
                }
            }
        }

        let count = loaded.len();
        self.prompts.write().await.extend(loaded);
        info!(
            "Loaded {} prompts from {:?}",
            count, self.config.prompt_dir
        );
        Ok(count)
    }
}
