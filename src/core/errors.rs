use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("knowledge source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read knowledge document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("chat backend error: {0}")]
    Backend(String),
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

impl KnowledgeError {
    pub fn config<E: std::fmt::Display>(err: E) -> Self {
        KnowledgeError::Config(err.to_string())
    }
}
