//! Helper functions for reading schema descriptions
//!
//! This module contains utility functions for extracting specific types
//! of values from parsed schema nodes, with positioned errors.

use crate::error::{SchemaError, SchemaResult};
use yamlschema_yaml::scalar::{parse_float, parse_int};
use yamlschema_yaml::{NodeKind, Tag, YamlNode};

/// Follow aliases; an unresolved alias is a structure error
pub(super) fn resolved(node: YamlNode<'_>) -> SchemaResult<YamlNode<'_>> {
    node.resolve()
        .ok_or_else(|| SchemaError::structure("unresolved alias", node.position()))
}

/// Null values count as absent
fn is_null(node: YamlNode<'_>) -> bool {
    match node.kind() {
        NodeKind::Null => true,
        NodeKind::Scalar => node.tag() == Some(&Tag::Null),
        _ => false,
    }
}

/// The raw text of a scalar
pub(super) fn scalar_text(node: YamlNode<'_>, what: &str) -> SchemaResult<String> {
    let node = resolved(node)?;
    if node.is_scalar() {
        return Ok(node.value().to_string());
    }
    Err(SchemaError::structure(
        format!("{} must be a scalar", what),
        node.position(),
    ))
}

/// Get a string value; any scalar is read as its text
pub(super) fn get_string(value: YamlNode<'_>, key: &str) -> SchemaResult<Option<String>> {
    let value = resolved(value)?;
    if is_null(value) {
        return Ok(None);
    }
    scalar_text(value, &format!("Field '{}'", key)).map(Some)
}

/// Get a boolean value
pub(super) fn get_bool(value: YamlNode<'_>, key: &str) -> SchemaResult<Option<bool>> {
    let value = resolved(value)?;
    if is_null(value) {
        return Ok(None);
    }
    if value.is_scalar() && value.tag() == Some(&Tag::Bool) {
        return Ok(Some(value.value().eq_ignore_ascii_case("true")));
    }
    Err(SchemaError::structure(
        format!("Field '{}' must be a boolean", key),
        value.position(),
    ))
}

/// Get a number value
pub(super) fn get_number(value: YamlNode<'_>, key: &str) -> SchemaResult<Option<f64>> {
    let value = resolved(value)?;
    if is_null(value) {
        return Ok(None);
    }
    if value.is_scalar() {
        let text = value.value();
        let number = match value.tag() {
            Some(Tag::Int) => parse_int(text).map(|i| i as f64),
            Some(Tag::Float) => parse_float(text).or_else(|| text.parse::<f64>().ok()),
            _ => None,
        };
        if let Some(number) = number {
            return Ok(Some(number));
        }
    }
    Err(SchemaError::structure(
        format!("Field '{}' must be a number", key),
        value.position(),
    ))
}

/// Get a usize value
pub(super) fn get_usize(value: YamlNode<'_>, key: &str) -> SchemaResult<Option<usize>> {
    let value = resolved(value)?;
    if is_null(value) {
        return Ok(None);
    }
    if value.is_scalar()
        && value.tag() == Some(&Tag::Int)
        && let Some(i) = parse_int(value.value())
        && i >= 0
    {
        return Ok(Some(i as usize));
    }
    Err(SchemaError::structure(
        format!("Field '{}' must be a non-negative integer", key),
        value.position(),
    ))
}

/// Get an array of strings
pub(super) fn get_string_array(value: YamlNode<'_>, key: &str) -> SchemaResult<Vec<String>> {
    let value = resolved(value)?;
    if is_null(value) {
        return Ok(Vec::new());
    }
    if !value.is_sequence() {
        return Err(SchemaError::structure(
            format!("Field '{}' must be an array", key),
            value.position(),
        ));
    }
    value
        .items()
        .map(|item| scalar_text(item, &format!("Field '{}' items", key)))
        .collect()
}

/// Get an array of arrays of strings
pub(super) fn get_string_groups(value: YamlNode<'_>, key: &str) -> SchemaResult<Vec<Vec<String>>> {
    let value = resolved(value)?;
    if is_null(value) {
        return Ok(Vec::new());
    }
    if !value.is_sequence() {
        return Err(SchemaError::structure(
            format!("Field '{}' must be an array of arrays", key),
            value.position(),
        ));
    }
    value
        .items()
        .map(|group| get_string_array(group, key))
        .collect()
}

/// Get the entries of a mapping, keyed by their text
pub(super) fn get_entries<'a>(
    value: YamlNode<'a>,
    key: &str,
) -> SchemaResult<Vec<(String, YamlNode<'a>, YamlNode<'a>)>> {
    let value = resolved(value)?;
    if is_null(value) {
        return Ok(Vec::new());
    }
    if !value.is_map() {
        return Err(SchemaError::structure(
            format!("Field '{}' must be a mapping", key),
            value.position(),
        ));
    }
    value
        .entries()
        .map(|(k, v)| Ok((scalar_text(k, "mapping key")?, k, v)))
        .collect()
}

/// Convert a node into a serde_json::Value (for defaults)
pub(super) fn node_to_json_value(node: YamlNode<'_>) -> SchemaResult<serde_json::Value> {
    use serde_json::Value;

    let node = resolved(node)?;
    match node.kind() {
        NodeKind::Null => Ok(Value::Null),
        NodeKind::Scalar => {
            let text = node.value();
            match node.tag() {
                Some(Tag::Null) => Ok(Value::Null),
                Some(Tag::Bool) => Ok(Value::Bool(text.eq_ignore_ascii_case("true"))),
                Some(Tag::Int) => match parse_int(text) {
                    Some(i) => Ok(Value::Number(i.into())),
                    None => Ok(Value::String(text.to_string())),
                },
                Some(Tag::Float) => match parse_float(text)
                    .or_else(|| text.parse::<f64>().ok())
                    .and_then(serde_json::Number::from_f64)
                {
                    Some(n) => Ok(Value::Number(n)),
                    None => Ok(Value::String(text.to_string())),
                },
                _ => Ok(Value::String(text.to_string())),
            }
        }
        NodeKind::Sequence => node
            .items()
            .map(node_to_json_value)
            .collect::<SchemaResult<Vec<_>>>()
            .map(Value::Array),
        NodeKind::Map => {
            let mut map = serde_json::Map::new();
            for (key, value) in node.entries() {
                map.insert(scalar_text(key, "mapping key")?, node_to_json_value(value)?);
            }
            Ok(Value::Object(map))
        }
        // resolved() never returns an alias
        NodeKind::Alias => Err(SchemaError::structure("unresolved alias", node.position())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yamlschema_yaml::parse;

    #[test]
    fn test_scalar_getters() {
        let doc = parse("a: true\nb: 3\nc: 2.5\nd: text\ne: ~\nf: -1").unwrap();
        let root = doc.root();
        let get = |k: &str| root.get(k).unwrap();

        assert_eq!(get_bool(get("a"), "a").unwrap(), Some(true));
        assert_eq!(get_usize(get("b"), "b").unwrap(), Some(3));
        assert_eq!(get_number(get("c"), "c").unwrap(), Some(2.5));
        assert_eq!(get_number(get("b"), "b").unwrap(), Some(3.0));
        assert_eq!(get_string(get("b"), "b").unwrap(), Some("3".to_string()));
        assert_eq!(get_string(get("e"), "e").unwrap(), None);
        assert!(get_bool(get("d"), "d").is_err());
        assert!(get_usize(get("f"), "f").is_err());
    }

    #[test]
    fn test_error_position() {
        let doc = parse("items:\n  - a\n  - [b]\n").unwrap();
        let err = get_string_array(doc.root().get("items").unwrap(), "items").unwrap_err();
        assert_eq!(err.position().map(|p| p.line), Some(3));
    }

    #[test]
    fn test_node_to_json_value() {
        let doc = parse("{a: 1, b: [x, 2.5, true], c: ~, d: 'str'}").unwrap();
        let value = node_to_json_value(doc.root()).unwrap();
        assert_eq!(value, json!({"a": 1, "b": ["x", 2.5, true], "c": null, "d": "str"}));
    }
}
