// Schema validation for YAML documents
//
// This crate checks parsed YAML against declarative schemas: type inference,
// structural validation of maps and sequences, merge keys, inter-field rules
// and pluggable value/key validators, reported as positioned diagnostics.

pub mod context;
pub mod diagnostic;
pub mod error;
pub mod format;
pub mod inference;
pub mod schema;
pub mod validators;

mod constraints;
mod mapping;
mod report;
mod validator;

pub use context::{ValidationContext, ValidationOptions};
pub use diagnostic::{Diagnostic, DiagnosticCollector, DiagnosticKind, Severity};
pub use error::{InstancePath, PathSegment, SchemaError, SchemaResult};
pub use format::{format_diagnostic, render_line_with_caret, RenderedLine, TAB_WIDTH};
pub use inference::{describe_node, infer_type, NodeType};
pub use report::ValidationReport;
pub use schema::{load_schema_file, load_schema_str, ConditionalRule, Schema, UnknownKeyPolicy};
pub use validator::{validate, validate_node, Validator};
pub use validators::{KeyValidator, ValidatorSpec, ValueValidator};
