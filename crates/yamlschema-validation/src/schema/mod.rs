//! Schema types for YAML validation
//!
//! A [`Schema`] describes one node: its expected type, map fields, sequence
//! fields, value validators, and cross-field rules over the keys of a map.
//! Child schemas are shared through `Arc` and never mutated while a
//! validation runs.
//!
//! Schemas are built in code with the fluent methods below, or loaded from
//! a YAML/JSON description with [`load_schema_str`] / [`load_schema_file`].

use crate::inference::NodeType;
use crate::validators::{KeyValidator, ValueValidator};
use std::collections::BTreeMap;
use std::sync::Arc;

mod helpers;
mod loader;
mod types;

pub use loader::{load_schema_file, load_schema_str};
pub use types::{display_default, ConditionalRule, UnknownKeyPolicy, UnknownPolicyName};

/// One node of a schema graph
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub node_type: NodeType,
    pub required: bool,
    pub nullable: bool,
    /// Message of the deprecation warning; `"true"` means the default message
    pub deprecated: Option<String>,
    pub description: Option<String>,
    /// Announced when the key is absent; never inserted into the document
    pub default: Option<serde_json::Value>,

    /// Known keys, in lexicographic order
    pub allowed_keys: BTreeMap<String, Arc<Schema>>,
    /// Schema for keys not in `allowed_keys`; overrides the unknown-key policy
    pub additional_properties: Option<Arc<Schema>>,
    pub unknown_key_policy: UnknownKeyPolicy,
    pub key_validators: Vec<Arc<dyn KeyValidator>>,

    pub item_schema: Option<Arc<Schema>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,

    pub validators: Vec<Arc<dyn ValueValidator>>,

    /// Satisfied when every key of at least one group is present
    pub any_of: Vec<Vec<String>>,
    pub exactly_one_of: Vec<String>,
    pub mutually_exclusive: Vec<String>,
    pub conditions: Vec<ConditionalRule>,
}

impl Schema {
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            ..Self::default()
        }
    }

    pub fn any() -> Self {
        Self::new(NodeType::Any)
    }

    pub fn string() -> Self {
        Self::new(NodeType::String)
    }

    pub fn int() -> Self {
        Self::new(NodeType::Int)
    }

    pub fn float() -> Self {
        Self::new(NodeType::Float)
    }

    pub fn bool() -> Self {
        Self::new(NodeType::Bool)
    }

    pub fn null() -> Self {
        Self::new(NodeType::Null)
    }

    pub fn map() -> Self {
        Self::new(NodeType::Map)
    }

    pub fn sequence() -> Self {
        Self::new(NodeType::Sequence)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn key(mut self, name: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Self {
        self.allowed_keys.insert(name.into(), schema.into());
        self
    }

    pub fn additional_properties(mut self, schema: impl Into<Arc<Schema>>) -> Self {
        self.additional_properties = Some(schema.into());
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_key_policy = policy;
        self
    }

    pub fn key_validator(mut self, validator: impl KeyValidator + 'static) -> Self {
        self.key_validators.push(Arc::new(validator));
        self
    }

    pub fn items(mut self, schema: impl Into<Arc<Schema>>) -> Self {
        self.item_schema = Some(schema.into());
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn validator(mut self, validator: impl ValueValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Add one AnyOf group
    pub fn any_of<S: Into<String>>(mut self, group: impl IntoIterator<Item = S>) -> Self {
        self.any_of.push(group.into_iter().map(Into::into).collect());
        self
    }

    pub fn exactly_one_of<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.exactly_one_of = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn mutually_exclusive<S: Into<String>>(
        mut self,
        keys: impl IntoIterator<Item = S>,
    ) -> Self {
        self.mutually_exclusive = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn condition(mut self, rule: ConditionalRule) -> Self {
        self.conditions.push(rule);
        self
    }

    /// Message of the deprecation warning, if any
    pub(crate) fn deprecation_message(&self) -> Option<&str> {
        match self.deprecated.as_deref() {
            None | Some("") | Some("false") => None,
            Some("true") => Some("this field is deprecated"),
            Some(message) => Some(message),
        }
    }
}
