//! YAML parser that builds arena-backed document trees from `yaml-rust2` events.

use crate::document::{DocumentBuilder, NodeId, ScalarStyle, Tag, YamlDocument};
use crate::{scalar, Error, LineIndex, Result};
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse the first document of a YAML string.
///
/// # Example
///
/// ```rust
/// use yamlschema_yaml::parse;
///
/// let doc = parse("title: My Document").unwrap();
/// assert!(doc.root().is_map());
/// assert_eq!(doc.root().get("title").unwrap().value(), "My Document");
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or holds no document.
pub fn parse(content: &str) -> Result<YamlDocument> {
    match parse_documents(content).next() {
        Some(result) => result,
        None => Err(Error::NoDocument),
    }
}

/// Parse every document of a YAML stream.
///
/// The stream yields the documents in source order. If the input has a
/// syntax error, the documents before it are yielded first and the error
/// comes last; nothing follows an error.
///
/// ```rust
/// use yamlschema_yaml::parse_documents;
///
/// let docs: Vec<_> = parse_documents("a: 1\n---\nb: [\n").collect();
/// assert_eq!(docs.len(), 2);
/// assert!(docs[0].is_ok());
/// assert!(docs[1].is_err());
/// ```
pub fn parse_documents(content: &str) -> DocumentStream {
    let mut parser = Parser::new_from_str(content);
    let mut builder = StreamBuilder::new(content);

    let outcome = parser.load(&mut builder, true);
    let scan_error = outcome
        .err()
        .map(|err| Error::from_scan(&err, &builder.index, content));

    let (documents, structure_error) = builder.finish();
    tracing::trace!(documents = documents.len(), "parsed YAML stream");

    DocumentStream {
        documents: documents.into_iter(),
        error: scan_error.or(structure_error),
    }
}

/// Documents of a YAML stream followed by an optional terminal error.
#[derive(Debug)]
pub struct DocumentStream {
    documents: std::vec::IntoIter<YamlDocument>,
    error: Option<Error>,
}

impl Iterator for DocumentStream {
    type Item = Result<YamlDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.documents.next() {
            Some(doc) => Some(Ok(doc)),
            None => self.error.take().map(Err),
        }
    }
}

/// Builder that implements MarkedEventReceiver to construct document arenas.
struct StreamBuilder<'a> {
    source: &'a str,
    index: LineIndex,

    /// Arena of the document currently being read
    current: DocumentBuilder,

    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Root of the current document, once complete
    root: Option<NodeId>,

    /// Completed nodes by anchor id
    anchors: HashMap<usize, NodeId>,

    documents: Vec<YamlDocument>,
    error: Option<Error>,
}

/// A collection being constructed during parsing.
enum BuildNode {
    Sequence {
        start_marker: Marker,
        anchor_id: usize,
        tag: Option<Tag>,
        items: Vec<NodeId>,
    },
    Mapping {
        start_marker: Marker,
        anchor_id: usize,
        tag: Option<Tag>,
        entries: Vec<(NodeId, NodeId)>,
        pending_key: Option<NodeId>,
    },
}

impl<'a> StreamBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            index: LineIndex::new(source),
            current: DocumentBuilder::default(),
            stack: Vec::new(),
            root: None,
            anchors: HashMap::new(),
            documents: Vec::new(),
            error: None,
        }
    }

    fn finish(self) -> (Vec<YamlDocument>, Option<Error>) {
        (self.documents, self.error)
    }

    fn fail(&mut self, message: &str) {
        if self.error.is_none() {
            self.error = Some(Error::structure(message));
        }
    }

    fn place(&mut self, id: NodeId, marker: &Marker) {
        let position = self.index.position(self.source, marker.index());
        self.current.set_position(id, position.line, position.column);
    }

    /// Register an anchor once its node is complete.
    ///
    /// An alias inside the node it refers to therefore stays unresolved,
    /// which keeps every tree acyclic.
    fn anchor(&mut self, anchor_id: usize, id: NodeId) {
        if anchor_id != 0 {
            self.anchors.insert(anchor_id, id);
        }
    }

    fn push_complete(&mut self, id: NodeId) {
        match self.stack.last_mut() {
            None => self.root = Some(id),
            Some(BuildNode::Sequence { items, .. }) => items.push(id),
            Some(BuildNode::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push((key, id)),
                None => *pending_key = Some(id),
            },
        }
    }

    fn end_document(&mut self) {
        let mut arena = std::mem::take(&mut self.current);
        let root = match self.root.take() {
            Some(root) => root,
            None => arena.null(),
        };
        self.documents.push(arena.finish(root));
        self.stack.clear();
        self.anchors.clear();
    }

    /// Plain `~` produced by the scanner for an empty value, as opposed to a
    /// `~` written in the source.
    fn is_implicit_null(&self, value: &str, style: ScalarStyle, marker: &Marker) -> bool {
        if value != "~" || !style.is_plain() {
            return false;
        }
        let byte = self.index.byte_offset(self.source, marker.index());
        !self.source[byte..].starts_with('~')
    }
}

fn scalar_style(style: TScalarStyle) -> ScalarStyle {
    match style {
        TScalarStyle::Plain => ScalarStyle::Plain,
        TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        TScalarStyle::Literal => ScalarStyle::Literal,
        _ => ScalarStyle::Folded,
    }
}

fn explicit_tag(tag: Option<yaml_rust2::parser::Tag>) -> Option<Tag> {
    tag.map(|t| Tag::from_parts(&t.handle, &t.suffix))
}

impl MarkedEventReceiver for StreamBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing => {}

            Event::StreamStart => {}
            Event::StreamEnd => {}
            Event::DocumentStart => {
                self.root = None;
            }
            Event::DocumentEnd => self.end_document(),

            Event::Scalar(value, style, anchor_id, tag) => {
                let style = scalar_style(style);
                let tag = match explicit_tag(tag) {
                    Some(tag) => tag,
                    None if !style.is_plain() => Tag::Str,
                    None => scalar::resolve_plain(&value),
                };
                let value = if self.is_implicit_null(&value, style, &marker) {
                    String::new()
                } else {
                    value
                };

                let id = self.current.styled_scalar(value, style, Some(tag));
                self.place(id, &marker);
                self.anchor(anchor_id, id);
                self.push_complete(id);
            }

            Event::SequenceStart(anchor_id, tag) => {
                self.stack.push(BuildNode::Sequence {
                    start_marker: marker,
                    anchor_id,
                    tag: explicit_tag(tag),
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(BuildNode::Sequence {
                    start_marker,
                    anchor_id,
                    tag,
                    items,
                }) => {
                    let id = self.current.sequence(items);
                    self.current.set_tag(id, tag);
                    self.place(id, &start_marker);
                    self.anchor(anchor_id, id);
                    self.push_complete(id);
                }
                _ => self.fail("sequence end without sequence start"),
            },

            Event::MappingStart(anchor_id, tag) => {
                self.stack.push(BuildNode::Mapping {
                    start_marker: marker,
                    anchor_id,
                    tag: explicit_tag(tag),
                    entries: Vec::new(),
                    pending_key: None,
                });
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(BuildNode::Mapping {
                    start_marker,
                    anchor_id,
                    tag,
                    entries,
                    pending_key: None,
                }) => {
                    let id = self.current.map(entries);
                    self.current.set_tag(id, tag);
                    self.place(id, &start_marker);
                    self.anchor(anchor_id, id);
                    self.push_complete(id);
                }
                Some(BuildNode::Mapping { .. }) => self.fail("mapping entry without value"),
                _ => self.fail("mapping end without mapping start"),
            },

            Event::Alias(anchor_id) => {
                let target = self.anchors.get(&anchor_id).copied();
                if target.is_none() {
                    tracing::trace!(anchor_id, "alias refers to an incomplete anchor");
                }
                let id = self.current.alias(target);
                self.place(id, &marker);
                self.push_complete(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeKind, Position};

    #[test]
    fn test_parse_scalar() {
        let doc = parse("hello").unwrap();
        let root = doc.root();
        assert!(root.is_scalar());
        assert_eq!(root.value(), "hello");
        assert_eq!(root.tag(), Some(&Tag::Str));
    }

    #[test]
    fn test_plain_scalar_tags() {
        let doc = parse("[42, 0x2A, 1.5, true, null, ~, text, '7']").unwrap();
        let tags: Vec<_> = doc.root().items().map(|n| n.tag().cloned()).collect();
        assert_eq!(
            tags,
            vec![
                Some(Tag::Int),
                Some(Tag::Int),
                Some(Tag::Float),
                Some(Tag::Bool),
                Some(Tag::Null),
                Some(Tag::Null),
                Some(Tag::Str),
                Some(Tag::Str),
            ]
        );
    }

    #[test]
    fn test_explicit_tags() {
        let doc = parse("a: !!str 42\nb: !custom x\nc: !!int '5'").unwrap();
        let root = doc.root();
        assert_eq!(root.get("a").unwrap().tag(), Some(&Tag::Str));
        assert_eq!(
            root.get("b").unwrap().tag(),
            Some(&Tag::Custom("!custom".to_string()))
        );
        assert_eq!(root.get("c").unwrap().tag(), Some(&Tag::Int));
    }

    #[test]
    fn test_empty_value_is_null_with_empty_text() {
        let doc = parse("a:\nb: ~\n").unwrap();
        let a = doc.root().get("a").unwrap();
        assert_eq!(a.tag(), Some(&Tag::Null));
        assert_eq!(a.value(), "");
        assert_eq!(doc.root().get("b").unwrap().value(), "~");
    }

    #[test]
    fn test_parse_hash() {
        let doc = parse("title: My Document\nauthor: John Doe").unwrap();
        let root = doc.root();
        assert!(root.is_map());
        assert_eq!(root.len(), 2);
        assert_eq!(root.get("title").unwrap().value(), "My Document");
        assert_eq!(root.get("author").unwrap().value(), "John Doe");
    }

    #[test]
    fn test_nested_structure() {
        let doc = parse(
            r#"
project:
  title: My Project
  authors:
    - Alice
    - Bob
"#,
        )
        .unwrap();

        let project = doc.root().get("project").unwrap();
        assert!(project.is_map());

        let authors = project.get("authors").unwrap();
        assert!(authors.is_sequence());
        assert_eq!(authors.len(), 2);
    }

    #[test]
    fn test_positions_are_one_based() {
        let doc = parse("title: x\nnested:\n  key: value\n").unwrap();
        let root = doc.root();
        assert_eq!(root.position(), Position::new(1, 1));

        let (key, value) = root.entries().nth(1).unwrap();
        assert_eq!(key.position(), Position::new(2, 1));
        assert!(value.is_map());

        let (inner_key, inner_value) = value.entries().next().unwrap();
        assert_eq!(inner_key.position(), Position::new(3, 3));
        assert_eq!(inner_value.position(), Position::new(3, 8));
    }

    #[test]
    fn test_column_counts_bytes() {
        let doc = parse("ключ: значение\n").unwrap();
        let (_, value) = doc.root().entries().next().unwrap();
        // "ключ: " is 8 + 2 bytes
        assert_eq!(value.position(), Position::new(1, 11));
    }

    #[test]
    fn test_alias_points_at_anchor() {
        let doc = parse("base: &b\n  timeout: 30\nother: *b\n").unwrap();
        let base = doc.root().get("base").unwrap();
        let other = doc.root().get("other").unwrap();
        assert_eq!(other.kind(), NodeKind::Alias);
        assert_eq!(other.position(), Position::new(3, 8));
        let target = other.resolve().unwrap();
        assert_eq!(target.id(), base.id());
        assert_eq!(target.get("timeout").unwrap().value(), "30");
    }

    #[test]
    fn test_recursive_alias_is_unresolved() {
        let doc = parse("a: &x [1, *x]\n").unwrap();
        let seq = doc.root().get("a").unwrap();
        let inner = seq.items().nth(1).unwrap();
        assert!(inner.is_alias());
        assert!(inner.resolve().is_none());
    }

    #[test]
    fn test_multiple_documents() {
        let docs: Vec<_> = parse_documents("a: 1\n---\nb: 2\n---\n- c\n")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs[2].root().is_sequence());
        assert_eq!(docs[1].root().position(), Position::new(3, 1));
    }

    #[test]
    fn test_empty_stream_has_no_documents() {
        assert_eq!(parse_documents("").count(), 0);
        assert!(matches!(parse(""), Err(Error::NoDocument)));
    }

    #[test]
    fn test_syntax_error_after_documents() {
        let results: Vec<_> = parse_documents("ok: 1\n---\nbad: [1, 2\n").collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        let position = err.position().unwrap();
        assert!(position.line >= 3);
        assert!(err.to_string().starts_with(&format!("yaml: line {}: column ", position.line)));
    }
}
