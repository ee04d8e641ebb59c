//! Positioned YAML nodes stored in a per-document arena.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside the [`YamlDocument`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its document's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A 1-based source position. `0` means unknown.
///
/// `column` counts bytes from the start of the line, so a caret renderer
/// has to convert it into a visual column (see the validation crate's
/// formatter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Position of a node that was not read from source text.
    pub const UNKNOWN: Position = Position { line: 0, column: 0 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (0, _) => write!(f, "unknown position"),
            (line, 0) => write!(f, "line {}", line),
            (line, column) => write!(f, "line {}:{}", line, column),
        }
    }
}

/// Resolved YAML tag of a node.
///
/// The core-schema tags get their own variants; anything else (`!custom`,
/// `!!binary`, `tag:example.com,2000:thing`) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Str,
    Int,
    Float,
    Bool,
    Null,
    Custom(String),
}

const CORE_SCHEMA_PREFIX: &str = "tag:yaml.org,2002:";

impl Tag {
    /// Build a tag from the handle/suffix pair reported by the scanner.
    pub fn from_parts(handle: &str, suffix: &str) -> Self {
        let core_suffix = match handle {
            "!!" => Some(suffix),
            CORE_SCHEMA_PREFIX => Some(suffix),
            "" => suffix.strip_prefix(CORE_SCHEMA_PREFIX),
            _ => None,
        };

        match core_suffix {
            Some("str") => Tag::Str,
            Some("int") => Tag::Int,
            Some("float") => Tag::Float,
            Some("bool") => Tag::Bool,
            Some("null") => Tag::Null,
            Some(other) => Tag::Custom(format!("!!{}", other)),
            // The non-specific tag `!` forces a plain scalar to be a string.
            None if handle == "!" && suffix.is_empty() => Tag::Str,
            None => Tag::Custom(format!("{}{}", handle, suffix)),
        }
    }

    /// Short name of the tag, without the `!!` shorthand.
    pub fn name(&self) -> &str {
        match self {
            Tag::Str => "str",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Bool => "bool",
            Tag::Null => "null",
            Tag::Custom(name) => name.strip_prefix("!!").unwrap_or(name),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a scalar was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    pub fn is_plain(self) -> bool {
        self == ScalarStyle::Plain
    }
}

/// The kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Null,
    Scalar,
    Map,
    Sequence,
    Alias,
}

/// A key/value pair of a mapping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: NodeId,
    pub value: NodeId,
}

#[derive(Debug, Clone)]
enum Content {
    Null,
    Scalar { value: String, style: ScalarStyle },
    Map(Vec<Entry>),
    Sequence(Vec<NodeId>),
    Alias(Option<NodeId>),
}

#[derive(Debug, Clone)]
struct NodeData {
    content: Content,
    tag: Option<Tag>,
    position: Position,
}

/// One parsed YAML document.
///
/// Nodes live in an arena owned by the document and refer to each other by
/// [`NodeId`]. Alias nodes point at their anchor's node through the same
/// arena, so following an alias never copies the aliased subtree and every
/// node keeps the position it was read at.
#[derive(Debug, Clone)]
pub struct YamlDocument {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl YamlDocument {
    /// Start building a document by hand.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// The document's root node.
    pub fn root(&self) -> YamlNode<'_> {
        self.node(self.root)
    }

    /// Look up a node created by this document.
    ///
    /// Returns `None` for ids that belong to another document.
    pub fn get(&self, id: NodeId) -> Option<YamlNode<'_>> {
        (id.0 < self.nodes.len()).then_some(YamlNode { doc: self, id })
    }

    fn node(&self, id: NodeId) -> YamlNode<'_> {
        YamlNode { doc: self, id }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// A borrowed, copyable view of one node of a [`YamlDocument`].
#[derive(Clone, Copy)]
pub struct YamlNode<'a> {
    doc: &'a YamlDocument,
    id: NodeId,
}

impl<'a> YamlNode<'a> {
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The document this node belongs to.
    pub fn document(self) -> &'a YamlDocument {
        self.doc
    }

    pub fn kind(self) -> NodeKind {
        match self.doc.data(self.id).content {
            Content::Null => NodeKind::Null,
            Content::Scalar { .. } => NodeKind::Scalar,
            Content::Map(_) => NodeKind::Map,
            Content::Sequence(_) => NodeKind::Sequence,
            Content::Alias(_) => NodeKind::Alias,
        }
    }

    pub fn is_scalar(self) -> bool {
        self.kind() == NodeKind::Scalar
    }

    pub fn is_map(self) -> bool {
        self.kind() == NodeKind::Map
    }

    pub fn is_sequence(self) -> bool {
        self.kind() == NodeKind::Sequence
    }

    pub fn is_alias(self) -> bool {
        self.kind() == NodeKind::Alias
    }

    pub fn tag(self) -> Option<&'a Tag> {
        self.doc.data(self.id).tag.as_ref()
    }

    /// Raw scalar text. Empty for every other kind of node.
    pub fn value(self) -> &'a str {
        match &self.doc.data(self.id).content {
            Content::Scalar { value, .. } => value,
            _ => "",
        }
    }

    pub fn style(self) -> Option<ScalarStyle> {
        match &self.doc.data(self.id).content {
            Content::Scalar { style, .. } => Some(*style),
            _ => None,
        }
    }

    pub fn position(self) -> Position {
        self.doc.data(self.id).position
    }

    pub fn line(self) -> usize {
        self.position().line
    }

    pub fn column(self) -> usize {
        self.position().column
    }

    /// The node an alias refers to.
    ///
    /// Returns `self` for non-alias nodes and `None` for an alias whose
    /// anchor could not be found.
    pub fn resolve(self) -> Option<YamlNode<'a>> {
        match self.doc.data(self.id).content {
            Content::Alias(Some(target)) => Some(self.doc.node(target)),
            Content::Alias(None) => None,
            _ => Some(self),
        }
    }

    /// Key/value pairs of a mapping, in source order.
    pub fn entries(self) -> impl Iterator<Item = (YamlNode<'a>, YamlNode<'a>)> + 'a {
        let doc = self.doc;
        let entries: &'a [Entry] = match &doc.data(self.id).content {
            Content::Map(entries) => entries,
            _ => &[],
        };
        entries
            .iter()
            .map(move |entry| (doc.node(entry.key), doc.node(entry.value)))
    }

    /// Items of a sequence, in source order.
    pub fn items(self) -> impl Iterator<Item = YamlNode<'a>> + 'a {
        let doc = self.doc;
        let items: &'a [NodeId] = match &doc.data(self.id).content {
            Content::Sequence(items) => items,
            _ => &[],
        };
        items.iter().map(move |id| doc.node(*id))
    }

    /// Number of sequence items or mapping entries.
    pub fn len(self) -> usize {
        match &self.doc.data(self.id).content {
            Content::Map(entries) => entries.len(),
            Content::Sequence(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Value of the first mapping entry whose key text is `key`.
    pub fn get(self, key: &str) -> Option<YamlNode<'a>> {
        self.entries()
            .find(|(k, _)| k.is_scalar() && k.value() == key)
            .map(|(_, v)| v)
    }
}

impl fmt::Debug for YamlNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("YamlNode");
        out.field("id", &self.id.0).field("kind", &self.kind());
        if let Some(tag) = self.tag() {
            out.field("tag", tag);
        }
        if self.is_scalar() {
            out.field("value", &self.value());
        } else if !self.is_alias() {
            out.field("len", &self.len());
        }
        out.field("position", &self.position()).finish()
    }
}

/// Incrementally builds a [`YamlDocument`].
///
/// Children have to be created before their parents; the id returned for
/// each node is passed to the constructor of the enclosing collection.
///
/// ```
/// use yamlschema_yaml::{Tag, YamlDocument};
///
/// let mut b = YamlDocument::builder();
/// let key = b.scalar("port");
/// let value = b.tagged_scalar(Tag::Int, "8080");
/// let root = b.map(vec![(key, value)]);
/// let doc = b.finish(root);
/// assert_eq!(doc.root().get("port").unwrap().value(), "8080");
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    nodes: Vec<NodeData>,
}

impl DocumentBuilder {
    fn push(&mut self, content: Content, tag: Option<Tag>) -> NodeId {
        self.nodes.push(NodeData {
            content,
            tag,
            position: Position::UNKNOWN,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// A null node with no scalar text.
    pub fn null(&mut self) -> NodeId {
        self.push(Content::Null, None)
    }

    /// An untagged plain scalar.
    pub fn scalar(&mut self, value: impl Into<String>) -> NodeId {
        self.push(
            Content::Scalar {
                value: value.into(),
                style: ScalarStyle::Plain,
            },
            None,
        )
    }

    /// A plain scalar carrying an explicit tag.
    pub fn tagged_scalar(&mut self, tag: Tag, value: impl Into<String>) -> NodeId {
        self.styled_scalar(value, ScalarStyle::Plain, Some(tag))
    }

    /// A double-quoted scalar; quoted scalars are always strings.
    pub fn quoted(&mut self, value: impl Into<String>) -> NodeId {
        self.styled_scalar(value, ScalarStyle::DoubleQuoted, Some(Tag::Str))
    }

    pub fn styled_scalar(
        &mut self,
        value: impl Into<String>,
        style: ScalarStyle,
        tag: Option<Tag>,
    ) -> NodeId {
        self.push(
            Content::Scalar {
                value: value.into(),
                style,
            },
            tag,
        )
    }

    pub fn map(&mut self, entries: Vec<(NodeId, NodeId)>) -> NodeId {
        let entries = entries
            .into_iter()
            .map(|(key, value)| Entry { key, value })
            .collect();
        self.push(Content::Map(entries), None)
    }

    pub fn sequence(&mut self, items: Vec<NodeId>) -> NodeId {
        self.push(Content::Sequence(items), None)
    }

    /// An alias node; `None` models an anchor that was never defined.
    pub fn alias(&mut self, target: Option<NodeId>) -> NodeId {
        self.push(Content::Alias(target), None)
    }

    pub fn set_tag(&mut self, id: NodeId, tag: Option<Tag>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.tag = tag;
        }
    }

    pub fn set_position(&mut self, id: NodeId, line: usize, column: usize) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.position = Position::new(line, column);
        }
    }

    /// Convenience for `set_position` that returns the id again.
    pub fn at(&mut self, id: NodeId, line: usize, column: usize) -> NodeId {
        self.set_position(id, line, column);
        id
    }

    pub fn finish(self, root: NodeId) -> YamlDocument {
        YamlDocument {
            nodes: self.nodes,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> YamlDocument {
        let mut b = YamlDocument::builder();
        let name_key = b.scalar("name");
        let name = b.quoted("web");
        let ports_key = b.scalar("ports");
        let p1 = b.tagged_scalar(Tag::Int, "80");
        let p2 = b.tagged_scalar(Tag::Int, "443");
        let ports = b.sequence(vec![p1, p2]);
        let alias_key = b.scalar("again");
        let alias = b.alias(Some(ports));
        let root = b.map(vec![(name_key, name), (ports_key, ports), (alias_key, alias)]);
        b.set_position(root, 1, 1);
        b.finish(root)
    }

    #[test]
    fn test_builder_map_lookup() {
        let doc = sample();
        let root = doc.root();
        assert!(root.is_map());
        assert_eq!(root.len(), 3);
        assert_eq!(root.get("name").unwrap().value(), "web");
        assert_eq!(root.get("name").unwrap().tag(), Some(&Tag::Str));
        assert!(root.get("missing").is_none());
        assert_eq!(root.position(), Position::new(1, 1));
    }

    #[test]
    fn test_alias_resolves_without_copying() {
        let doc = sample();
        let ports = doc.root().get("ports").unwrap();
        let again = doc.root().get("again").unwrap();
        assert!(again.is_alias());
        assert_eq!(again.resolve().unwrap().id(), ports.id());
        assert_eq!(again.resolve().unwrap().items().count(), 2);
    }

    #[test]
    fn test_unresolved_alias() {
        let mut b = YamlDocument::builder();
        let alias = b.alias(None);
        let doc = b.finish(alias);
        assert!(doc.root().resolve().is_none());
    }

    #[test]
    fn test_tag_from_parts() {
        assert_eq!(Tag::from_parts("!!", "int"), Tag::Int);
        assert_eq!(Tag::from_parts("tag:yaml.org,2002:", "str"), Tag::Str);
        assert_eq!(Tag::from_parts("", "tag:yaml.org,2002:bool"), Tag::Bool);
        assert_eq!(Tag::from_parts("!", ""), Tag::Str);
        assert_eq!(Tag::from_parts("!", "env"), Tag::Custom("!env".to_string()));
        assert_eq!(Tag::from_parts("!!", "binary").name(), "binary");
    }

    #[test]
    fn test_foreign_id_is_rejected() {
        let doc = sample();
        let mut other = YamlDocument::builder();
        let mut last = other.null();
        for _ in 0..20 {
            last = other.null();
        }
        assert!(doc.get(last).is_none());
    }
}
