use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::paths::AppPaths;
use super::settings::AppConfig;
use super::validation::validate_config;
use crate::core::errors::KnowledgeError;

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 8] = [
    "api_key",
    "secret",
    "password",
    "_token",
    "token_",
    "credential",
    "private_key",
    "bearer",
];

const SENSITIVE_WHITELIST: [&str; 3] = ["max_tokens", "tokenizer", "tokens"];

/// Provider credentials reported at startup: (config key, env var, shown prefix length).
const PROVIDER_KEYS: [(&str, &str, usize); 4] = [
    ("openai_api_key", "OPENAI_API_KEY", 8),
    ("anthropic_api_key", "ANTHROPIC_API_KEY", 7),
    ("google_api_key", "GOOGLE_API_KEY", 2),
    ("grok_api_key", "GROK_API_KEY", 4),
];

/// Whether a provider key is configured, with a short prefix for eyeballing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatus {
    pub name: &'static str,
    pub prefix: Option<String>,
}

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("KB_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = self.paths.user_data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        self.paths.project_root.join("config.yml")
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.paths.secrets_path.clone()
    }

    /// Merged `config.yml` + `secrets.yaml` as a raw value.
    pub fn load_raw(&self) -> Result<Value, KnowledgeError> {
        let public_config = load_yaml_file(&self.config_path())?;
        let secrets_config = load_yaml_file(&self.secrets_path())?;
        Ok(deep_merge(&public_config, &secrets_config))
    }

    /// Load, validate and type the configuration. Relative knowledge paths are
    /// resolved against the project root.
    pub fn load_config(&self) -> Result<AppConfig, KnowledgeError> {
        let raw = self.load_raw()?;
        validate_config(&raw)?;
        tracing::debug!("Loaded config: {}", redact_sensitive_values(&raw));

        let mut config: AppConfig = serde_json::from_value(raw).map_err(KnowledgeError::config)?;
        config.knowledge.base_dir = self.paths.resolve(&config.knowledge.base_dir);
        Ok(config)
    }

    /// Provider key status from secrets, falling back to the environment.
    pub fn key_status(&self) -> Result<Vec<KeyStatus>, KnowledgeError> {
        let raw = self.load_raw()?;
        let secrets = raw.get("secrets");

        Ok(PROVIDER_KEYS
            .iter()
            .map(|(name, env_var, prefix_len)| {
                let value = secrets
                    .and_then(|s| s.get(*name))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| env::var(env_var).ok())
                    .filter(|v| !v.trim().is_empty());
                KeyStatus {
                    name: *name,
                    prefix: value.map(|v| v.chars().take(*prefix_len).collect()),
                }
            })
            .collect())
    }
}

fn load_yaml_file(path: &Path) -> Result<Value, KnowledgeError> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| KnowledgeError::Config(format!("{}: {}", path.display(), e)))?;
    let value = serde_yaml::from_str::<Value>(&contents)
        .map_err(|e| KnowledgeError::Config(format!("{}: {}", path.display(), e)))?;

    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(KnowledgeError::Config(format!(
            "{}: top level must be a mapping",
            path.display()
        ))),
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}

fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) && !val.is_null() {
                    redacted.insert(key.clone(), Value::String(REDACT_PLACEHOLDER.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_values(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_values).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    if SENSITIVE_WHITELIST
        .iter()
        .any(|allowed| *allowed == key_lower)
    {
        return false;
    }
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| key_lower.contains(pattern))
}
