use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::rag::{ContextConfig, KeyStrategy, KnowledgeSource, DEFAULT_SYSTEM_PREFIX};

/// Typed view of the merged `config.yml` + `secrets.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub knowledge: KnowledgeConfig,
    pub context: ContextConfig,
    pub assistant: AssistantConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Sources are resolved against this directory when relative
    pub base_dir: PathBuf,
    pub sources: Vec<KnowledgeSource>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("knowledge-base"),
            sources: vec![
                KnowledgeSource::new("employees", KeyStrategy::LastWord),
                KnowledgeSource::new("products", KeyStrategy::Stem),
            ],
        }
    }
}

impl KnowledgeConfig {
    /// Sources with `base_dir` applied.
    pub fn resolved_sources(&self) -> Vec<KnowledgeSource> {
        self.sources
            .iter()
            .map(|source| KnowledgeSource::new(self.base_dir.join(&source.dir), source.key_strategy))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub model: String,
    pub system_prefix: String,
    /// Pause between streamed chunks
    pub chunk_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            system_prefix: DEFAULT_SYSTEM_PREFIX.to_string(),
            chunk_delay_ms: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Also write a daily-rolling file under the log directory
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
        }
    }
}
