//! Keyword-context retrieval for a small RAG chat assistant.
//!
//! A corpus of documents is keyed by a normalized filename (a surname, a
//! product slug). Each user message is tokenized and every token that names a
//! document pulls that document into the prompt context.

pub mod core;
pub mod llm;
pub mod output;
pub mod rag;

pub use crate::core::errors::KnowledgeError;
pub use crate::rag::{KeywordContextBuilder, KnowledgeIndex, SharedKnowledgeIndex};
