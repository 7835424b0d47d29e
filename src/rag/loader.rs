//! Corpus loading for the keyword index.
//!
//! Each source is a directory of UTF-8 documents. The key for a document is
//! derived from its filename:
//! - `last_word`: `"Alex Lancaster.md"` → `lancaster` (employee records)
//! - `stem`: `"CarLLM.md"` → `carllm` (product records)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::KnowledgeError;

/// How a document key is derived from its file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Last whitespace-separated word of the stem.
    LastWord,
    /// The whole stem.
    #[default]
    Stem,
}

impl KeyStrategy {
    /// Derive the lower-case key for `path`, if its stem yields one.
    pub fn key_for(&self, path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_string_lossy();
        let raw = match self {
            KeyStrategy::LastWord => stem.split_whitespace().last()?,
            KeyStrategy::Stem => &stem[..],
        };
        let key = raw.to_lowercase();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

/// A directory of documents plus the rule for keying them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSource {
    pub dir: PathBuf,
    #[serde(default)]
    pub key_strategy: KeyStrategy,
}

impl KnowledgeSource {
    pub fn new(dir: impl Into<PathBuf>, key_strategy: KeyStrategy) -> Self {
        Self {
            dir: dir.into(),
            key_strategy,
        }
    }
}

/// Read every non-hidden file directly inside the source directory into a
/// key → text map.
///
/// Files are visited in filename order so collisions resolve the same way on
/// every platform.
pub fn load_source(source: &KnowledgeSource) -> Result<HashMap<String, String>, KnowledgeError> {
    let read_dir = fs::read_dir(&source.dir).map_err(|e| KnowledgeError::SourceUnavailable {
        path: source.dir.clone(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| KnowledgeError::SourceUnavailable {
            path: source.dir.clone(),
            source: e,
        })?;
        // Hidden files (.DS_Store, .gitkeep) are not documents.
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = HashMap::new();
    for path in paths {
        let Some(key) = source.key_strategy.key_for(&path) else {
            tracing::warn!("Cannot derive a knowledge key from {}", path.display());
            continue;
        };
        if !is_reachable_key(&key) {
            tracing::warn!(
                "Knowledge key '{}' from {} is not a single alphabetic word and can never match a query",
                key,
                path.display()
            );
        }
        let text = fs::read_to_string(&path).map_err(|e| KnowledgeError::Read {
            path: path.clone(),
            source: e,
        })?;
        if documents.insert(key.clone(), text).is_some() {
            tracing::debug!("Knowledge key '{}' overwritten by {}", key, path.display());
        }
    }

    tracing::info!(
        "Loaded {} knowledge documents from {}",
        documents.len(),
        source.dir.display()
    );
    Ok(documents)
}

/// Query tokens are single runs of letters, so only such keys can ever match.
fn is_reachable_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(char::is_alphabetic)
}

/// Load several sources into one map; later sources win on key collisions.
pub fn load_sources(sources: &[KnowledgeSource]) -> Result<HashMap<String, String>, KnowledgeError> {
    let mut merged = HashMap::new();
    for source in sources {
        for (key, text) in load_source(source)? {
            if merged.insert(key.clone(), text).is_some() {
                tracing::debug!(
                    "Knowledge key '{}' overwritten by source {}",
                    key,
                    source.dir.display()
                );
            }
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_key_strategies() {
        let path = Path::new("knowledge-base/employees/Alex Lancaster.md");
        assert_eq!(KeyStrategy::LastWord.key_for(path).as_deref(), Some("lancaster"));
        assert_eq!(
            KeyStrategy::Stem.key_for(path).as_deref(),
            Some("alex lancaster")
        );

        let path = Path::new("products/CarLLM.md");
        assert_eq!(KeyStrategy::Stem.key_for(path).as_deref(), Some("carllm"));
        assert_eq!(KeyStrategy::LastWord.key_for(path).as_deref(), Some("carllm"));

        assert_eq!(KeyStrategy::LastWord.key_for(Path::new("   .md")), None);
        // The stem is used as-is, surrounding spaces included.
        assert_eq!(
            KeyStrategy::Stem.key_for(Path::new(" CarLLM .md")).as_deref(),
            Some(" carllm ")
        );
    }

    #[test]
    fn test_reachable_keys() {
        assert!(is_reachable_key("lancaster"));
        assert!(is_reachable_key("straße"));
        assert!(!is_reachable_key("alex lancaster"));
        assert!(!is_reachable_key("car-llm"));
        assert!(!is_reachable_key("gpt4"));
        assert!(!is_reachable_key(""));
    }

    #[test]
    fn test_hidden_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Alex Lancaster.md", "Alex bio");
        write(tmp.path(), ".gitkeep", "");
        fs::write(tmp.path().join(".DS_Store"), [0x00, 0x00, 0x00, 0x01, 0xff, 0xfe]).unwrap();

        let docs = load_source(&KnowledgeSource::new(tmp.path(), KeyStrategy::LastWord)).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs["lancaster"], "Alex bio");
    }

    #[test]
    fn test_load_source_reads_files_only() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Alex Lancaster.md", "Alex bio");
        write(tmp.path(), "Avery Lancaster.md", "Avery bio");
        write(tmp.path(), "Jordan Blake.md", "Jordan bio");
        fs::create_dir(tmp.path().join("Nested Dir")).unwrap();

        let docs = load_source(&KnowledgeSource::new(tmp.path(), KeyStrategy::LastWord)).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs["blake"], "Jordan bio");
        // "Avery Lancaster.md" sorts after "Alex Lancaster.md" and wins.
        assert_eq!(docs["lancaster"], "Avery bio");
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let employees = TempDir::new().unwrap();
        let products = TempDir::new().unwrap();
        write(employees.path(), "Sam Carllm.md", "an employee");
        write(products.path(), "CarLLM.md", "a product");

        let docs = load_sources(&[
            KnowledgeSource::new(employees.path(), KeyStrategy::LastWord),
            KnowledgeSource::new(products.path(), KeyStrategy::Stem),
        ])
        .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs["carllm"], "a product");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let err = load_source(&KnowledgeSource::new(&missing, KeyStrategy::Stem)).unwrap_err();
        assert!(matches!(err, KnowledgeError::SourceUnavailable { ref path, .. } if path == &missing));
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Broken.md"), [0xff, 0xfe, 0x00]).unwrap();

        let err = load_source(&KnowledgeSource::new(tmp.path(), KeyStrategy::Stem)).unwrap_err();
        assert!(matches!(err, KnowledgeError::Read { .. }));
    }

    #[test]
    fn test_key_strategy_deserializes_from_snake_case() {
        let source: KnowledgeSource =
            serde_json::from_str(r#"{"dir": "kb/employees", "key_strategy": "last_word"}"#).unwrap();
        assert_eq!(source.key_strategy, KeyStrategy::LastWord);

        let source: KnowledgeSource = serde_json::from_str(r#"{"dir": "kb/products"}"#).unwrap();
        assert_eq!(source.key_strategy, KeyStrategy::Stem);
    }
}
