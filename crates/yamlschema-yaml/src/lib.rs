//! # yamlschema-yaml
//!
//! YAML parsing into positioned node trees.
//!
//! Every document of a stream becomes a [`YamlDocument`]: an arena of nodes
//! addressed by [`NodeId`] and navigated through the copyable [`YamlNode`]
//! handle. Each node keeps its 1-based line and byte column, its resolved
//! [`Tag`], and for aliases a link to the anchored node in the same arena.
//!
//! ## Example
//!
//! ```rust
//! use yamlschema_yaml::{parse_documents, Tag};
//!
//! let content = "port: 8080\n---\nport: http\n";
//! for doc in parse_documents(content) {
//!     let doc = doc.unwrap();
//!     let port = doc.root().get("port").unwrap();
//!     println!("{} at line {}", port.value(), port.line());
//! }
//! ```

mod document;
mod error;
mod line_index;
mod parser;
pub mod scalar;

pub use document::{
    DocumentBuilder, Entry, NodeId, NodeKind, Position, ScalarStyle, Tag, YamlDocument, YamlNode,
};
pub use error::{Error, Result};
pub use line_index::LineIndex;
pub use parser::{parse, parse_documents, DocumentStream};
