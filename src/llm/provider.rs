use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::ChatMessage;
use crate::core::errors::KnowledgeError;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// return the backend name (e.g. "openai", "ollama")
    fn name(&self) -> &str;

    /// chat completion (non-streaming)
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String, KnowledgeError>;

    /// chat completion (streaming), one text delta per item
    async fn stream(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<mpsc::Receiver<Result<String, KnowledgeError>>, KnowledgeError>;
}
