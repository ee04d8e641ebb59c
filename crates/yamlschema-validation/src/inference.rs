//! Semantic type inference for nodes.

use crate::context::ValidationOptions;
use crate::diagnostic::quoted;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use yamlschema_yaml::scalar::{parse_float, parse_int};
use yamlschema_yaml::{NodeKind, Tag, YamlNode};

/// The semantic type a schema expects, or a node was inferred to have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Any,
    Null,
    String,
    Int,
    Float,
    Bool,
    Map,
    Sequence,
}

impl NodeType {
    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Any => "any",
            NodeType::Null => "null",
            NodeType::String => "string",
            NodeType::Int => "integer",
            NodeType::Float => "float",
            NodeType::Bool => "boolean",
            NodeType::Map => "map",
            NodeType::Sequence => "sequence",
        }
    }

    /// Whether a value of type `actual` satisfies `self`. Float accepts Int.
    pub fn accepts(&self, actual: NodeType) -> bool {
        *self == actual || (*self == NodeType::Float && actual == NodeType::Int)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Unknown type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeName(pub String);

impl FromStr for NodeType {
    type Err = UnknownTypeName;

    /// Parse a type name as written in schema files (case-insensitive).
    /// The empty string means `any`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "any" => Ok(NodeType::Any),
            "null" => Ok(NodeType::Null),
            "string" => Ok(NodeType::String),
            "int" | "integer" => Ok(NodeType::Int),
            "float" | "number" => Ok(NodeType::Float),
            "bool" | "boolean" => Ok(NodeType::Bool),
            "map" | "object" => Ok(NodeType::Map),
            "sequence" | "array" => Ok(NodeType::Sequence),
            _ => Err(UnknownTypeName(s.to_string())),
        }
    }
}

fn is_yaml11_bool(lower: &str) -> bool {
    matches!(
        lower,
        "y" | "yes" | "true" | "on" | "n" | "no" | "false" | "off"
    )
}

/// Infer the semantic type of a node.
///
/// Aliases infer through their target; an unresolved alias is `Any`.
pub fn infer_type(node: YamlNode<'_>, options: &ValidationOptions) -> NodeType {
    match node.kind() {
        NodeKind::Map => NodeType::Map,
        NodeKind::Sequence => NodeType::Sequence,
        NodeKind::Null => NodeType::Null,
        NodeKind::Scalar => infer_scalar_type(node, options),
        NodeKind::Alias => match node.resolve() {
            Some(target) if target.id() != node.id() => infer_type(target, options),
            _ => NodeType::Any,
        },
    }
}

fn infer_scalar_type(node: YamlNode<'_>, options: &ValidationOptions) -> NodeType {
    let value = node.value();

    // Core tags are trusted
    match node.tag() {
        Some(Tag::Str) => {
            if options.yaml11_booleans && is_yaml11_bool(&value.to_lowercase()) {
                return NodeType::Bool;
            }
            return NodeType::String;
        }
        Some(Tag::Int) => return NodeType::Int,
        Some(Tag::Float) => return NodeType::Float,
        Some(Tag::Bool) => return NodeType::Bool,
        Some(Tag::Null) => return NodeType::Null,
        Some(Tag::Custom(_)) | None => {}
    }

    if options.strict_types {
        return NodeType::String;
    }

    let lower = value.to_lowercase();

    // Empty text only comes with a null tag; untagged "" is a string
    if lower == "null" || value == "~" {
        return NodeType::Null;
    }
    if lower == "true" || lower == "false" {
        return NodeType::Bool;
    }
    if options.yaml11_booleans && is_yaml11_bool(&lower) {
        return NodeType::Bool;
    }
    if parse_int(value).is_some() {
        return NodeType::Int;
    }
    if parse_float(value).is_some() {
        return NodeType::Float;
    }
    NodeType::String
}

/// Short description of a node for "got" details: `map`,
/// `sequence (len=3)` or `str "value"`.
pub fn describe_node(node: YamlNode<'_>) -> String {
    match node.kind() {
        NodeKind::Map => "map".to_string(),
        NodeKind::Sequence => format!("sequence (len={})", node.len()),
        NodeKind::Null => "null".to_string(),
        NodeKind::Scalar => {
            let value = node.value();
            let shown = match value.char_indices().nth(20) {
                Some((cut, _)) => format!("{}...", &value[..cut]),
                None => value.to_string(),
            };
            let tag = node.tag().map(Tag::name).unwrap_or("scalar");
            format!("{} {}", tag, quoted(&shown))
        }
        NodeKind::Alias => match node.resolve() {
            Some(target) if target.id() != node.id() => describe_node(target),
            _ => "alias".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yamlschema_yaml::YamlDocument;

    fn infer_untagged(value: &str, options: &ValidationOptions) -> NodeType {
        let mut b = YamlDocument::builder();
        let id = b.scalar(value);
        let doc = b.finish(id);
        infer_type(doc.root(), options)
    }

    fn infer_tagged(tag: Tag, value: &str, options: &ValidationOptions) -> NodeType {
        let mut b = YamlDocument::builder();
        let id = b.tagged_scalar(tag, value);
        let doc = b.finish(id);
        infer_type(doc.root(), options)
    }

    #[test]
    fn test_untagged_pattern_order() {
        let opts = ValidationOptions::default();
        assert_eq!(infer_untagged("NULL", &opts), NodeType::Null);
        assert_eq!(infer_untagged("~", &opts), NodeType::Null);
        assert_eq!(infer_untagged("TRUE", &opts), NodeType::Bool);
        assert_eq!(infer_untagged("42", &opts), NodeType::Int);
        assert_eq!(infer_untagged("0x2A", &opts), NodeType::Int);
        assert_eq!(infer_untagged("0o52", &opts), NodeType::Int);
        assert_eq!(infer_untagged("0b101010", &opts), NodeType::Int);
        assert_eq!(infer_untagged("-17", &opts), NodeType::Int);
        assert_eq!(infer_untagged("0777", &opts), NodeType::Int);
        assert_eq!(infer_untagged("1.5", &opts), NodeType::Float);
        assert_eq!(infer_untagged("1e3", &opts), NodeType::Float);
        assert_eq!(infer_untagged("-.Inf", &opts), NodeType::Float);
        assert_eq!(infer_untagged(".nan", &opts), NodeType::Float);
        assert_eq!(infer_untagged("yes", &opts), NodeType::String);
        assert_eq!(infer_untagged("", &opts), NodeType::String);
        assert_eq!(infer_untagged("99999999999999999999", &opts), NodeType::String);
    }

    #[test]
    fn test_yaml11_booleans() {
        let opts = ValidationOptions {
            yaml11_booleans: true,
            ..Default::default()
        };
        assert_eq!(infer_untagged("On", &opts), NodeType::Bool);
        assert_eq!(infer_untagged("n", &opts), NodeType::Bool);
        assert_eq!(infer_tagged(Tag::Str, "yes", &opts), NodeType::Bool);
        assert_eq!(
            infer_tagged(Tag::Str, "yes", &ValidationOptions::default()),
            NodeType::String
        );
    }

    #[test]
    fn test_tags_are_trusted() {
        let opts = ValidationOptions::default();
        assert_eq!(infer_tagged(Tag::Str, "42", &opts), NodeType::String);
        assert_eq!(infer_tagged(Tag::Int, "abc", &opts), NodeType::Int);
        assert_eq!(infer_tagged(Tag::Null, "", &opts), NodeType::Null);
        let custom = Tag::Custom("!env".to_string());
        assert_eq!(infer_tagged(custom, "12", &opts), NodeType::Int);
    }

    #[test]
    fn test_strict_types_skip_parsing() {
        let opts = ValidationOptions {
            strict_types: true,
            ..Default::default()
        };
        assert_eq!(infer_untagged("42", &opts), NodeType::String);
        assert_eq!(infer_tagged(Tag::Int, "42", &opts), NodeType::Int);
    }

    #[test]
    fn test_alias_infers_through_target() {
        let mut b = YamlDocument::builder();
        let item = b.tagged_scalar(Tag::Int, "1");
        let seq = b.sequence(vec![item]);
        let alias = b.alias(Some(seq));
        let dangling = b.alias(None);
        let root = b.sequence(vec![seq, alias, dangling]);
        let doc = b.finish(root);
        let opts = ValidationOptions::default();
        let items: Vec<_> = doc.root().items().map(|n| infer_type(n, &opts)).collect();
        assert_eq!(items, vec![NodeType::Sequence, NodeType::Sequence, NodeType::Any]);
    }

    #[test]
    fn test_describe_node() {
        let mut b = YamlDocument::builder();
        let short = b.tagged_scalar(Tag::Str, "abc");
        let long = b.scalar("abcdefghijklmnopqrstuvwxyz");
        let seq = b.sequence(vec![short, long]);
        let key = b.scalar("k");
        let map = b.map(vec![(key, seq)]);
        let doc = b.finish(map);

        assert_eq!(describe_node(doc.root()), "map");
        let seq = doc.root().get("k").unwrap();
        assert_eq!(describe_node(seq), "sequence (len=2)");
        let items: Vec<_> = seq.items().map(describe_node).collect();
        assert_eq!(items[0], "str \"abc\"");
        assert_eq!(items[1], "scalar \"abcdefghijklmnopqrst...\"");
    }

    #[test]
    fn test_describe_node_escapes_control_characters() {
        let mut b = YamlDocument::builder();
        let id = b.tagged_scalar(Tag::Str, "\u{1b}[1mbold\ttab");
        let doc = b.finish(id);
        assert_eq!(describe_node(doc.root()), "str \"\\x1b[1mbold\\ttab\"");
    }

    #[test]
    fn test_type_names_parse() {
        assert_eq!("Integer".parse::<NodeType>(), Ok(NodeType::Int));
        assert_eq!("".parse::<NodeType>(), Ok(NodeType::Any));
        assert_eq!("object".parse::<NodeType>(), Ok(NodeType::Map));
        assert!("strin".parse::<NodeType>().is_err());
        assert!(NodeType::Float.accepts(NodeType::Int));
        assert!(!NodeType::Int.accepts(NodeType::Float));
    }
}
