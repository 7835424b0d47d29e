use serde_json::{Map, Value};

use crate::core::errors::KnowledgeError;

const KEY_STRATEGIES: [&str; 2] = ["last_word", "stem"];

pub fn validate_config(config: &Value) -> Result<(), KnowledgeError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(knowledge) = expect_optional_object(root, "knowledge")? {
        validate_optional_string_field(knowledge, "knowledge.base_dir", "base_dir")?;

        if let Some(value) = knowledge.get("sources") {
            let sources = value
                .as_array()
                .ok_or_else(|| config_type_error("knowledge.sources", "array"))?;
            for (index, source) in sources.iter().enumerate() {
                let path_prefix = format!("knowledge.sources[{}]", index);
                let entry = source
                    .as_object()
                    .ok_or_else(|| config_type_error(&path_prefix, "object"))?;
                validate_required_string_field(entry, &format!("{}.dir", path_prefix), "dir")?;
                validate_enum_field(
                    entry,
                    &format!("{}.key_strategy", path_prefix),
                    "key_strategy",
                    &KEY_STRATEGIES,
                )?;
            }
        }
    }

    if let Some(context) = expect_optional_object(root, "context")? {
        validate_optional_string_field(context, "context.intro", "intro")?;
        validate_optional_string_field(context, "context.no_context", "no_context")?;
        validate_optional_string_field(context, "context.separator", "separator")?;
    }

    if let Some(assistant) = expect_optional_object(root, "assistant")? {
        validate_optional_string_field(assistant, "assistant.model", "model")?;
        validate_optional_string_field(assistant, "assistant.system_prefix", "system_prefix")?;
        validate_u64_field(
            assistant,
            "assistant.chunk_delay_ms",
            "chunk_delay_ms",
            0,
            10_000,
        )?;
    }

    if let Some(logging) = expect_optional_object(root, "logging")? {
        validate_optional_string_field(logging, "logging.level", "level")?;
        validate_bool_field(logging, "logging.file", "file")?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, KnowledgeError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(config_type_error(key, "object")),
        None => Ok(None),
    }
}

fn validate_bool_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), KnowledgeError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.as_bool().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "boolean"))
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), KnowledgeError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(KnowledgeError::Config(format!(
            "Invalid config at '{}': must be between {} and {}",
            path, min, max
        )));
    }
    Ok(())
}

fn validate_required_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), KnowledgeError> {
    let value = section.get(key).ok_or_else(|| {
        KnowledgeError::Config(format!("Invalid config at '{}': value is required", path))
    })?;
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if text.trim().is_empty() {
        return Err(KnowledgeError::Config(format!(
            "Invalid config at '{}': value cannot be empty",
            path
        )));
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), KnowledgeError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.as_str().is_none() {
        return Err(config_type_error(path, "string"));
    }
    Ok(())
}

fn validate_enum_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    allowed: &[&str],
) -> Result<(), KnowledgeError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if !allowed.contains(&text) {
        return Err(KnowledgeError::Config(format!(
            "Invalid config at '{}': expected one of {}",
            path,
            allowed.join(", ")
        )));
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &str) -> KnowledgeError {
    KnowledgeError::Config(format!(
        "Invalid config at '{}': expected {}",
        path, expected
    ))
}
