/*
 * bundle.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading text bundles from JSON and YAML.

use crate::error::{TextError, TextResult};
use crate::value::TextValue;
use std::path::Path;

impl TextValue {
    /// Parse a JSON document, keeping object key order.
    pub fn from_json_str(source: &str) -> TextResult<TextValue> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parse a YAML document.
    ///
    /// Non-string mapping keys are stringified, and tags are dropped.
    pub fn from_yaml_str(source: &str) -> TextResult<TextValue> {
        let value: serde_yaml::Value = serde_yaml::from_str(source)?;
        Ok(TextValue::from(value))
    }
}

impl From<serde_json::Value> for TextValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TextValue::Null,
            serde_json::Value::Bool(b) => TextValue::Bool(b),
            serde_json::Value::Number(n) => TextValue::Number(n),
            serde_json::Value::String(s) => TextValue::String(s),
            serde_json::Value::Array(items) => {
                TextValue::List(items.into_iter().map(TextValue::from).collect())
            }
            serde_json::Value::Object(entries) => TextValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, TextValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for TextValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => TextValue::Null,
            serde_yaml::Value::Bool(b) => TextValue::Bool(b),
            serde_yaml::Value::Number(n) => yaml_number(&n),
            serde_yaml::Value::String(s) => TextValue::String(s),
            serde_yaml::Value::Sequence(items) => {
                TextValue::List(items.into_iter().map(TextValue::from).collect())
            }
            serde_yaml::Value::Mapping(entries) => TextValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (yaml_key(k), TextValue::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => TextValue::from(tagged.value),
        }
    }
}

fn yaml_number(n: &serde_yaml::Number) -> TextValue {
    if let Some(i) = n.as_i64() {
        TextValue::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        TextValue::Number(u.into())
    } else {
        n.as_f64().map_or(TextValue::Null, TextValue::from)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match TextValue::from(key) {
        TextValue::String(s) => s,
        TextValue::Null => String::new(),
        other => other.to_interpolated(),
    }
}

/// Load a text bundle from a `.json`, `.yaml` or `.yml` file.
pub fn load_bundle(path: impl AsRef<Path>) -> TextResult<TextValue> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let source = match extension.as_deref() {
        Some("json" | "yaml" | "yml") => std::fs::read_to_string(path)?,
        _ => {
            return Err(TextError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    tracing::debug!(path = %path.display(), "loading text bundle");
    match extension.as_deref() {
        Some("json") => TextValue::from_json_str(&source),
        _ => TextValue::from_yaml_str(&source),
    }
}
