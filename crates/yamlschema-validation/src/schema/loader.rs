//! Reading schema descriptions (YAML or JSON text) into [`Schema`] graphs.
//!
//! The description is parsed with the same YAML 1.2 parser as the documents
//! being validated, so every loading error can point at the offending line.
//! JSON descriptions are read as YAML flow collections.

use super::helpers::{
    get_bool, get_entries, get_number, get_string, get_string_array, get_string_groups, get_usize,
    node_to_json_value, resolved, scalar_text,
};
use super::{ConditionalRule, Schema, UnknownKeyPolicy};
use crate::error::{SchemaError, SchemaResult};
use crate::inference::NodeType;
use crate::validators::registry::{self, ValidatorSpec};
use std::path::Path;
use std::sync::Arc;
use yamlschema_yaml::{NodeKind, Tag, YamlNode};

/// Load a schema from YAML or JSON text
pub fn load_schema_str(content: &str) -> SchemaResult<Schema> {
    let document = yamlschema_yaml::parse(content)?;
    let schema = schema_from_node(document.root())?;
    tracing::debug!(
        node_type = %schema.node_type,
        keys = schema.allowed_keys.len(),
        "loaded schema"
    );
    Ok(schema)
}

/// Load a schema from a YAML or JSON file
pub fn load_schema_file(path: impl AsRef<Path>) -> SchemaResult<Schema> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "reading schema file");
    load_schema_str(&content)
}

fn is_empty_node(node: YamlNode<'_>) -> bool {
    match node.kind() {
        NodeKind::Null => true,
        NodeKind::Scalar => node.tag() == Some(&Tag::Null),
        _ => false,
    }
}

/// Build one schema node. An empty node is the `any` schema.
fn schema_from_node(node: YamlNode<'_>) -> SchemaResult<Schema> {
    let node = resolved(node)?;
    if is_empty_node(node) {
        return Ok(Schema::any());
    }
    if !node.is_map() {
        return Err(SchemaError::structure(
            "schema must be a mapping",
            node.position(),
        ));
    }

    let mut schema = Schema::default();
    for (key, key_node, value) in get_entries(node, "schema")? {
        match key.as_str() {
            "type" => {
                let name = get_string(value, &key)?.unwrap_or_default();
                schema.node_type = name.parse::<NodeType>().map_err(|err| {
                    SchemaError::UnknownType {
                        name: err.0,
                        position: value.position(),
                    }
                })?;
            }
            "required" => schema.required = get_bool(value, &key)?.unwrap_or(false),
            "nullable" => schema.nullable = get_bool(value, &key)?.unwrap_or(false),
            "deprecated" => schema.deprecated = get_string(value, &key)?,
            "description" => schema.description = get_string(value, &key)?,
            "default" => {
                // A null default means there is none
                schema.default = Some(node_to_json_value(value)?).filter(|v| !v.is_null());
            }
            "allowedKeys" => {
                for (name, _, child) in get_entries(value, &key)? {
                    let child = schema_from_node(child)
                        .map_err(|err| err.nested(format!("allowedKeys[{}]", name)))?;
                    schema.allowed_keys.insert(name, Arc::new(child));
                }
            }
            "additionalProperties" => {
                let child = schema_from_node(value).map_err(|err| err.nested("additionalProperties"))?;
                schema.additional_properties = Some(Arc::new(child));
            }
            "unknownKeyPolicy" => {
                let name = get_string(value, &key)?.unwrap_or_default();
                schema.unknown_key_policy = name.parse::<UnknownKeyPolicy>().map_err(|err| {
                    SchemaError::UnknownPolicy {
                        name: err.0,
                        position: value.position(),
                    }
                })?;
            }
            "keyValidators" => {
                for (index, spec) in validator_specs(value, &key)?.iter().enumerate() {
                    let validator = registry::key_validator(spec)
                        .map_err(|err| err.nested(format!("keyValidators[{}]", index)))?;
                    schema.key_validators.push(validator);
                }
            }
            "itemSchema" => {
                let child = schema_from_node(value).map_err(|err| err.nested("itemSchema"))?;
                schema.item_schema = Some(Arc::new(child));
            }
            "minItems" => schema.min_items = get_usize(value, &key)?,
            "maxItems" => schema.max_items = get_usize(value, &key)?,
            "validators" => {
                for (index, spec) in validator_specs(value, &key)?.iter().enumerate() {
                    let validator = registry::value_validator(spec)
                        .map_err(|err| err.nested(format!("validators[{}]", index)))?;
                    schema.validators.push(validator);
                }
            }
            "anyOf" => schema.any_of = get_string_groups(value, &key)?,
            "exactlyOneOf" => schema.exactly_one_of = get_string_array(value, &key)?,
            "mutuallyExclusive" => schema.mutually_exclusive = get_string_array(value, &key)?,
            "conditions" => schema.conditions = conditions(value, &key)?,
            _ => {
                return Err(SchemaError::UnknownKey {
                    key: key.clone(),
                    position: key_node.position(),
                });
            }
        }
    }
    Ok(schema)
}

fn validator_specs(value: YamlNode<'_>, key: &str) -> SchemaResult<Vec<ValidatorSpec>> {
    let value = resolved(value)?;
    if is_empty_node(value) {
        return Ok(Vec::new());
    }
    if !value.is_sequence() {
        return Err(SchemaError::structure(
            format!("Field '{}' must be an array", key),
            value.position(),
        ));
    }
    value.items().map(validator_spec).collect()
}

fn validator_spec(node: YamlNode<'_>) -> SchemaResult<ValidatorSpec> {
    let node = resolved(node)?;
    let mut spec = ValidatorSpec {
        position: node.position(),
        ..ValidatorSpec::default()
    };
    let mut has_name = false;

    for (key, key_node, value) in get_entries(node, "validator")? {
        match key.as_str() {
            "name" => {
                spec.name = get_string(value, &key)?.unwrap_or_default();
                has_name = true;
            }
            "allowed" => spec.allowed = get_string_array(value, &key)?,
            "pattern" => spec.pattern = get_string(value, &key)?,
            "message" => spec.message = get_string(value, &key)?,
            "min" => spec.min = get_number(value, &key)?,
            "max" => spec.max = get_number(value, &key)?,
            "minLength" => spec.min_length = get_usize(value, &key)?,
            "maxLength" => spec.max_length = get_usize(value, &key)?,
            "requireScheme" => spec.require_scheme = get_bool(value, &key)?.unwrap_or(false),
            "allowedSchemes" => spec.allowed_schemes = get_string_array(value, &key)?,
            "types" => spec.types = get_string_array(value, &key)?,
            "forbidden" => spec.forbidden = get_string_array(value, &key)?,
            _ => {
                return Err(SchemaError::UnknownKey {
                    key: key.clone(),
                    position: key_node.position(),
                });
            }
        }
    }

    if !has_name {
        return Err(SchemaError::structure(
            "validator entry requires a name",
            spec.position,
        ));
    }
    Ok(spec)
}

fn conditions(value: YamlNode<'_>, key: &str) -> SchemaResult<Vec<ConditionalRule>> {
    let value = resolved(value)?;
    if is_empty_node(value) {
        return Ok(Vec::new());
    }
    if !value.is_sequence() {
        return Err(SchemaError::structure(
            format!("Field '{}' must be an array", key),
            value.position(),
        ));
    }

    let mut rules = Vec::new();
    for (index, item) in value.items().enumerate() {
        let rule = condition(item).map_err(|err| err.nested(format!("conditions[{}]", index)))?;
        rules.push(rule);
    }
    Ok(rules)
}

fn condition(node: YamlNode<'_>) -> SchemaResult<ConditionalRule> {
    let mut rule = ConditionalRule::default();
    let mut has_field = false;

    for (key, key_node, value) in get_entries(node, "condition")? {
        match key.as_str() {
            "conditionField" => {
                rule.field = get_string(value, &key)?.unwrap_or_default();
                has_field = true;
            }
            "conditionValue" => rule.value = scalar_text(value, "conditionValue")?,
            "thenRequired" => rule.then_required = get_string_array(value, &key)?,
            "thenForbidden" => rule.then_forbidden = get_string_array(value, &key)?,
            _ => {
                return Err(SchemaError::UnknownKey {
                    key: key.clone(),
                    position: key_node.position(),
                });
            }
        }
    }

    if !has_field {
        return Err(SchemaError::structure(
            "condition requires conditionField",
            node.position(),
        ));
    }
    Ok(rule)
}
