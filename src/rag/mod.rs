//! RAG (Retrieval-Augmented Generation) module.
//!
//! This module provides:
//! - `KnowledgeIndex`: Keyword → document lookup over an in-memory corpus
//! - `loader`: Builds the corpus from directories of documents
//! - `KeywordContextBuilder`: Turns matched documents into a prompt context block

pub mod context_builder;
pub mod index;
pub mod loader;

pub use context_builder::{ContextConfig, KeywordContextBuilder, DEFAULT_SYSTEM_PREFIX};
pub use index::{tokenize, KnowledgeIndex, SharedKnowledgeIndex};
pub use loader::{KeyStrategy, KnowledgeSource};
