// Error types for schema loading and instance paths

use std::fmt;
use thiserror::Error;
use yamlschema_yaml::Position;

/// Errors that can occur while loading a schema description
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema description has the wrong shape
    #[error("invalid schema structure: {message} ({position})")]
    InvalidStructure { message: String, position: Position },

    /// A key the schema format does not know
    #[error("unknown schema key {key:?} ({position})")]
    UnknownKey { key: String, position: Position },

    /// Invalid `type` name
    #[error("unknown type: {name:?} ({position})")]
    UnknownType { name: String, position: Position },

    /// Invalid `unknownKeyPolicy` name
    #[error("unknown unknownKeyPolicy: {name:?} ({position})")]
    UnknownPolicy { name: String, position: Position },

    /// Value validator name missing from the registry
    #[error("unknown validator name: {name:?} ({position})")]
    UnknownValidator { name: String, position: Position },

    /// Key validator name missing from the registry
    #[error("unknown key validator name: {name:?} ({position})")]
    UnknownKeyValidator { name: String, position: Position },

    /// A `pattern` that does not compile
    #[error("invalid pattern {pattern:?} ({position}): {source}")]
    InvalidPattern {
        pattern: String,
        position: Position,
        #[source]
        source: regex::Error,
    },

    /// Error inside a nested schema, prefixed with where it happened
    #[error("{context}: {source}")]
    Nested {
        context: String,
        #[source]
        source: Box<SchemaError>,
    },

    /// The schema text is not valid YAML or JSON
    #[error("schema is not valid YAML: {0}")]
    Yaml(#[from] yamlschema_yaml::Error),

    /// The schema file could not be read
    #[error("read schema {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    pub(crate) fn structure(message: impl Into<String>, position: Position) -> Self {
        SchemaError::InvalidStructure {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn nested(self, context: impl Into<String>) -> Self {
        SchemaError::Nested {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Where in the schema text the error was found, if known
    pub fn position(&self) -> Option<Position> {
        match self {
            SchemaError::InvalidStructure { position, .. }
            | SchemaError::UnknownKey { position, .. }
            | SchemaError::UnknownType { position, .. }
            | SchemaError::UnknownPolicy { position, .. }
            | SchemaError::UnknownValidator { position, .. }
            | SchemaError::UnknownKeyValidator { position, .. }
            | SchemaError::InvalidPattern { position, .. } => {
                position.is_known().then_some(*position)
            }
            SchemaError::Nested { source, .. } => source.position(),
            SchemaError::Yaml(err) => err.position(),
            SchemaError::Io { .. } => None,
        }
    }
}

/// Result type for schema loading operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Instance path (e.g., `doc[2].spec.containers[0].image`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// Create a new empty instance path
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a key segment onto the path
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Push an index segment onto the path
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Push a document segment onto the path
    pub fn push_document(&mut self, index: usize) {
        self.segments.push(PathSegment::Document(index));
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Get the segments as a slice
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the length of the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The rendered path with one more key segment, without modifying `self`
    pub fn child_key(&self, key: &str) -> String {
        let mut path = self.to_string();
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(key);
        path
    }
}

/// The root renders as an empty string; keys are joined with `.` and
/// indices attach directly: `doc[1].items[0].name`.
impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// A segment in an instance path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
    /// Document of a multi-document stream
    Document(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Document(index) => write!(f, "doc[{}]", index),
        }
    }
}
