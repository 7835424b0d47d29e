use std::sync::Arc;
use std::time::Duration;

use super::provider::ChatBackend;
use super::types::ChatMessage;
use crate::core::config::AssistantConfig;
use crate::core::errors::KnowledgeError;
use crate::output::{relay_stream, OutputSink};
use crate::rag::{ContextConfig, KeywordContextBuilder, SharedKnowledgeIndex};

/// Answers user messages with keyword context injected into the system prompt.
///
/// Everything a chat turn needs is held here instead of in process globals, so
/// one assistant can be cloned into any number of request handlers.
#[derive(Clone)]
pub struct Assistant {
    index: SharedKnowledgeIndex,
    backend: Arc<dyn ChatBackend>,
    model: String,
    system_prefix: String,
    context: KeywordContextBuilder,
    chunk_delay: Duration,
}

impl Assistant {
    pub fn new(
        index: SharedKnowledgeIndex,
        backend: Arc<dyn ChatBackend>,
        model: impl Into<String>,
        system_prefix: impl Into<String>,
    ) -> Self {
        Self {
            index,
            backend,
            model: model.into(),
            system_prefix: system_prefix.into(),
            context: KeywordContextBuilder::default(),
            chunk_delay: Duration::ZERO,
        }
    }

    /// Assistant configured from the `assistant` and `context` config sections.
    pub fn from_config(
        index: SharedKnowledgeIndex,
        backend: Arc<dyn ChatBackend>,
        config: &AssistantConfig,
        context: ContextConfig,
    ) -> Self {
        Self {
            index,
            backend,
            model: config.model.clone(),
            system_prefix: config.system_prefix.clone(),
            context: KeywordContextBuilder::new(context),
            chunk_delay: Duration::from_millis(config.chunk_delay_ms),
        }
    }

    pub fn index(&self) -> &SharedKnowledgeIndex {
        &self.index
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Pause between streamed chunks.
    pub fn chunk_delay(&self) -> Duration {
        self.chunk_delay
    }

    /// `[system] + history + [user]` for one turn.
    pub fn build_messages(&self, message: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let system = self
            .index
            .read(|index| self.context.system_prompt(&self.system_prefix, index, message));

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(message));
        messages
    }

    pub async fn answer(&self, message: &str, history: &[ChatMessage]) -> Result<String, KnowledgeError> {
        let messages = self.build_messages(message, history);
        tracing::debug!(
            "Sending {} messages to {} ({})",
            messages.len(),
            self.backend.name(),
            self.model
        );
        self.backend.complete(&messages, &self.model).await
    }

    /// Stream the reply into `sink`, returning the full text.
    pub async fn answer_streaming(
        &self,
        message: &str,
        history: &[ChatMessage],
        sink: &mut dyn OutputSink,
    ) -> Result<String, KnowledgeError> {
        let messages = self.build_messages(message, history);
        let rx = self.backend.stream(&messages, &self.model).await?;
        relay_stream(rx, sink, self.chunk_delay).await
    }
}
