//! Panel system settings snapshot and its JSON decoding.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::panel::PanelError;

pub const API_ALLOWED_IP: &str = "API_ALLOWED_IP";
pub const API: &str = "API";
pub const API_SYSTEM: &str = "API_SYSTEM";

/// Placeholder shown for keys the panel did not report.
pub const NOT_SET: &str = "not set";

/// Read-only key/value snapshot of the panel's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemSettings {
    values: BTreeMap<String, String>,
}

impl SystemSettings {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for display, or `not set`.
    pub fn display(&self, key: &str) -> &str {
        self.get(key).unwrap_or(NOT_SET)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SystemSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Decode the dump command's stdout.
///
/// The panel nests everything under a `config` object; a flat top-level
/// object is accepted too. Any other truthy JSON decodes to an empty
/// snapshot, so every key reads "not set". Bytes that are not UTF-8 make the
/// dump invalid JSON.
pub fn parse_settings(raw: &[u8]) -> Result<SystemSettings, PanelError> {
    let value: Value = serde_json::from_slice(raw).map_err(PanelError::InvalidJson)?;
    if is_falsy(&value) {
        return Err(PanelError::EmptyConfig);
    }

    let map = match &value {
        Value::Object(top) => match top.get("config") {
            Some(Value::Object(nested)) => nested,
            _ => top,
        },
        other => {
            tracing::warn!(kind = json_kind(other), "Configuration dump is not a JSON object");
            return Ok(SystemSettings::default());
        }
    };

    Ok(map
        .iter()
        .filter_map(|(key, value)| stringify(value).map(|v| (key.clone(), v)))
        .collect())
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
