//! Supporting types for schema nodes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a mapping key that has no schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Error with `strict_keys`, warning otherwise
    #[default]
    Inherit,
    Error,
    Warn,
    Ignore,
}

impl fmt::Display for UnknownKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnknownKeyPolicy::Inherit => "inherit",
            UnknownKeyPolicy::Error => "error",
            UnknownKeyPolicy::Warn => "warn",
            UnknownKeyPolicy::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

/// Unknown policy name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicyName(pub String);

impl FromStr for UnknownKeyPolicy {
    type Err = UnknownPolicyName;

    /// Case-insensitive; the empty string means `inherit`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "inherit" => Ok(UnknownKeyPolicy::Inherit),
            "warn" => Ok(UnknownKeyPolicy::Warn),
            "error" => Ok(UnknownKeyPolicy::Error),
            "ignore" => Ok(UnknownKeyPolicy::Ignore),
            _ => Err(UnknownPolicyName(s.to_string())),
        }
    }
}

/// When `field` holds exactly `value`, require some keys and forbid others.
///
/// `value` is compared with the raw text of the scalar found under `field`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionalRule {
    #[serde(rename = "conditionField")]
    pub field: String,
    #[serde(rename = "conditionValue")]
    pub value: String,
    pub then_required: Vec<String>,
    pub then_forbidden: Vec<String>,
}

impl ConditionalRule {
    pub fn when(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn require<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.then_required.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn forbid<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.then_forbidden.extend(keys.into_iter().map(Into::into));
        self
    }
}

/// Render a default value for the "will use default" warning: strings bare,
/// sequences as `[a b]`, mappings as `map[k:v]` with sorted keys, null as
/// `<nil>`.
pub fn display_default(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "<nil>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let items: Vec<_> = items.iter().map(display_default).collect();
            format!("[{}]", items.join(" "))
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let entries: Vec<_> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", k, display_default(v)))
                .collect();
            format!("map[{}]", entries.join(" "))
        }
    }
}
