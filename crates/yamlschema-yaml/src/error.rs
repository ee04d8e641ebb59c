//! Error types for YAML parsing.

use crate::{LineIndex, Position};
use thiserror::Error;

/// Result type alias for yamlschema-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a YAML stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner.
    #[error("yaml: line {line}: column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    /// The input held no document.
    #[error("yaml: no document found")]
    NoDocument,

    /// The event stream did not describe a well-formed tree.
    #[error("yaml: invalid structure: {message}")]
    InvalidStructure { message: String },
}

impl Error {
    pub(crate) fn from_scan(err: &yaml_rust2::ScanError, index: &LineIndex, source: &str) -> Self {
        let position = index.position(source, err.marker().index());
        Error::Syntax {
            message: err.info().to_string(),
            line: position.line,
            column: position.column,
        }
    }

    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Error::InvalidStructure {
            message: message.into(),
        }
    }

    /// Source position of a syntax error.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Syntax { line, column, .. } => Some(Position::new(*line, *column)),
            _ => None,
        }
    }
}
