//! Pluggable value and key validators.
//!
//! A [`ValueValidator`] runs on a node after its type check passed. A
//! [`KeyValidator`] runs on every key of a mapping, known or not. Both only
//! report through the [`ValidationContext`]; they never stop the walk
//! themselves.
//!
//! The bundled implementations are constructed by name through
//! [`registry`], which is what the schema loader uses.

use crate::context::ValidationContext;
use std::fmt::Debug;
use yamlschema_yaml::YamlNode;

mod enum_values;
mod keys;
mod length;
mod nonempty;
mod one_of_type;
mod pattern;
mod range;
pub mod registry;
mod url;

pub use enum_values::EnumValidator;
pub use keys::{ForbiddenKeyValidator, LengthKeyValidator, PatternKeyValidator};
pub use length::LengthValidator;
pub use nonempty::NonEmptyValidator;
pub use one_of_type::OneOfTypeValidator;
pub use pattern::PatternValidator;
pub use range::RangeValidator;
pub use registry::ValidatorSpec;
pub use url::UrlValidator;

/// Validates a node's value
pub trait ValueValidator: Debug + Send + Sync {
    /// Check `node`, which sits at `path`, and report findings to `ctx`
    fn validate(&self, node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext);
}

/// Validates key names of mappings
pub trait KeyValidator: Debug + Send + Sync {
    /// Check `key`, whose node is `key_node` and whose entry sits at `path`
    fn validate_key(&self, key: &str, key_node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext);
}
