//! Keyword Context Builder.
//!
//! Builds the context block handed to the model:
//! 1. Look up documents whose keyword appears in the user message
//! 2. Join them with blank lines
//! 3. Prefix them with a fixed explanatory sentence

use serde::{Deserialize, Serialize};

use super::index::{KnowledgeIndex, SharedKnowledgeIndex};

pub const DEFAULT_SYSTEM_PREFIX: &str = "
You represent Insurellm, the Insurance Tech company.
You are an expert in answering questions about Insurellm; its employees and its products.
You are provided with additional context that might be relevant to the user's question.
Give brief, accurate answers. If you don't know the answer, say so.

Relevant context:
";

/// Configuration for context building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Sentence placed before the matched documents
    pub intro: String,
    /// Text used when nothing matched
    pub no_context: String,
    /// Separator between documents
    pub separator: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            intro: "The following additional context might be relevant in answering the user's question:\n\n"
                .to_string(),
            no_context: "There is no additional context relevant to the user's question.".to_string(),
            separator: "\n\n".to_string(),
        }
    }
}

/// Keyword Context Builder.
#[derive(Debug, Clone, Default)]
pub struct KeywordContextBuilder {
    config: ContextConfig,
}

impl KeywordContextBuilder {
    pub fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Context block for `message`, or the no-context sentence.
    pub fn additional_context(&self, index: &KnowledgeIndex, message: &str) -> String {
        self.format_context(&index.relevant_documents(message))
    }

    /// Same as [`additional_context`](Self::additional_context) over a shared index.
    pub fn additional_context_shared(&self, index: &SharedKnowledgeIndex, message: &str) -> String {
        index.read(|index| self.additional_context(index, message))
    }

    /// Full system prompt: `prefix` followed by the context block.
    pub fn system_prompt(&self, prefix: &str, index: &KnowledgeIndex, message: &str) -> String {
        let mut prompt = String::from(prefix);
        prompt.push_str(&self.additional_context(index, message));
        prompt
    }

    fn format_context(&self, documents: &[&str]) -> String {
        if documents.is_empty() {
            return self.config.no_context.clone();
        }

        let mut context = self.config.intro.clone();
        context.push_str(&documents.join(&self.config.separator));
        context
    }
}
