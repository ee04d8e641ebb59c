// YAML validation engine

use crate::context::{ValidationContext, ValidationOptions};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::inference::{describe_node, infer_type, NodeType};
use crate::mapping::validate_mapping;
use crate::report::ValidationReport;
use crate::schema::Schema;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use yamlschema_yaml::{NodeKind, YamlDocument, YamlNode};

/// Validates YAML text against a schema.
///
/// A `Validator` is immutable and can be shared between threads; each call
/// runs with its own [`ValidationContext`].
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Arc<Schema>,
    options: ValidationOptions,
}

impl Validator {
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            schema: schema.into(),
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate every document of a YAML stream.
    ///
    /// Documents are validated in order. A parse error is reported once, at
    /// path `doc[<index>]`, and ends the run; documents before it keep their
    /// diagnostics.
    pub fn validate_str(&self, content: &str) -> ValidationReport {
        let mut ctx = ValidationContext::new(self.options);
        let mut documents = 0;

        for (index, document) in yamlschema_yaml::parse_documents(content).enumerate() {
            let document = match document {
                Ok(document) => document,
                Err(err) => {
                    tracing::debug!(document = index, error = %err, "parse error");
                    ctx.add(parse_error_diagnostic(&err.to_string(), index));
                    break;
                }
            };
            documents += 1;

            tracing::debug!(document = index, nodes = document.node_count(), "validating document");
            self.validate_root(&document, index, &mut ctx);

            if ctx.is_stopped() {
                tracing::debug!(document = index, "stopped after first error");
                break;
            }
        }

        let report = ValidationReport::new(ctx.into_collector(), content);
        tracing::debug!(
            documents,
            errors = report.errors().len(),
            warnings = report.warnings().len(),
            "validation finished"
        );
        report
    }

    /// Validate an already parsed document as document 0 of a stream
    pub fn validate_document(&self, document: &YamlDocument) -> ValidationReport {
        let mut ctx = ValidationContext::new(self.options);
        self.validate_root(document, 0, &mut ctx);
        ValidationReport::new(ctx.into_collector(), "")
    }

    fn validate_root(&self, document: &YamlDocument, index: usize, ctx: &mut ValidationContext) {
        let root = document.root();
        let schema = &self.schema;
        ctx.with_document(index, |ctx| validate_node(root, schema, ctx));
    }
}

/// Validate `content` against `schema` with `options`
pub fn validate(content: &str, schema: impl Into<Arc<Schema>>, options: ValidationOptions) -> ValidationReport {
    Validator::new(schema).with_options(options).validate_str(content)
}

static LINE_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"line (\d+):\s*column (\d+)").expect("valid regex"));
static LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"line (\d+):").expect("valid regex"));

/// Turn a parser error message into a diagnostic, reading the position out
/// of the message text
fn parse_error_diagnostic(message: &str, index: usize) -> Diagnostic {
    let number = |text: &str| text.parse::<usize>().unwrap_or(0);
    let (line, column) = if let Some(caps) = LINE_COLUMN_RE.captures(message) {
        (number(&caps[1]), number(&caps[2]))
    } else if let Some(caps) = LINE_RE.captures(message) {
        (number(&caps[1]), 0)
    } else {
        (0, 0)
    };

    let mut diagnostic = Diagnostic::error(DiagnosticKind::ParseError, message)
        .with_path(format!("doc[{}]", index));
    diagnostic.line = line;
    diagnostic.column = column;
    diagnostic
}

/// Validate a node and its subtree against a schema.
///
/// The node sits at the context's current instance path. Findings go to the
/// context; nothing is reported once the context has stopped.
pub fn validate_node(node: YamlNode<'_>, schema: &Schema, ctx: &mut ValidationContext) {
    if ctx.is_stopped() {
        return;
    }

    let node = match node.resolve() {
        Some(target) => {
            if target.id() != node.id() {
                tracing::trace!(alias = node.id().index(), target = target.id().index(), "resolved alias");
            }
            target
        }
        None => {
            ctx.add(
                Diagnostic::error(DiagnosticKind::UnresolvedAlias, "unresolved alias")
                    .with_path(ctx.path())
                    .at(node),
            );
            return;
        }
    };

    if let Some(message) = schema.deprecation_message() {
        ctx.add(
            Diagnostic::warning(DiagnosticKind::Deprecated, message)
                .with_path(ctx.path())
                .at(node),
        );
    }

    if !check_type(node, schema, ctx) {
        return;
    }

    match node.kind() {
        NodeKind::Map => validate_mapping(node, schema, ctx),
        NodeKind::Sequence => validate_sequence(node, schema, ctx),
        _ => {}
    }

    let path = ctx.path();
    for validator in &schema.validators {
        if ctx.is_stopped() {
            return;
        }
        validator.validate(node, &path, ctx);
    }
}

/// Check the node's inferred type against the schema, reporting a mismatch
fn check_type(node: YamlNode<'_>, schema: &Schema, ctx: &mut ValidationContext) -> bool {
    let expected = schema.node_type;
    if expected == NodeType::Any {
        return true;
    }

    let actual = infer_type(node, ctx.options());
    if actual == NodeType::Null {
        if expected == NodeType::Null || schema.nullable {
            return true;
        }
        ctx.add(
            Diagnostic::error(DiagnosticKind::UnexpectedNull, "unexpected null value")
                .with_path(ctx.path())
                .at(node)
                .with_expected(expected.name())
                .with_got("null"),
        );
        return false;
    }

    if expected.accepts(actual) {
        return true;
    }

    ctx.add(
        Diagnostic::error(DiagnosticKind::TypeMismatch, "type mismatch")
            .with_path(ctx.path())
            .at(node)
            .with_expected(expected.name())
            .with_got(describe_node(node)),
    );
    false
}

fn validate_sequence(node: YamlNode<'_>, schema: &Schema, ctx: &mut ValidationContext) {
    let length = node.len();

    if let Some(min) = schema.min_items
        && length < min
    {
        ctx.add(
            Diagnostic::error(DiagnosticKind::ItemCount, "too few items")
                .with_path(ctx.path())
                .at(node)
                .with_expected(format!("at least {}", min))
                .with_got(length.to_string()),
        );
    }

    if let Some(max) = schema.max_items
        && length > max
    {
        ctx.add(
            Diagnostic::error(DiagnosticKind::ItemCount, "too many items")
                .with_path(ctx.path())
                .at(node)
                .with_expected(format!("at most {}", max))
                .with_got(length.to_string()),
        );
    }

    let Some(item_schema) = &schema.item_schema else {
        return;
    };

    for (index, item) in node.items().enumerate() {
        if ctx.is_stopped() {
            return;
        }
        ctx.with_index(index, |ctx| validate_node(item, item_schema, ctx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_position_from_message() {
        let d = parse_error_diagnostic("yaml: line 3: column 7: did not find expected key", 1);
        assert_eq!((d.line, d.column), (3, 7));
        assert_eq!(d.path, "doc[1]");
        assert_eq!(d.kind, DiagnosticKind::ParseError);

        let d = parse_error_diagnostic("yaml: line 12: mapping values are not allowed", 0);
        assert_eq!((d.line, d.column), (12, 0));

        let d = parse_error_diagnostic("yaml: no document found", 0);
        assert_eq!((d.line, d.column), (0, 0));
    }

    #[test]
    fn test_type_check_messages() {
        let schema = Schema::map()
            .key("port", Schema::int())
            .key("name", Schema::string());
        let report = validate("port: abc\nname: ~\n", schema, ValidationOptions::default());
        let errors = report.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "type mismatch");
        assert_eq!(errors[0].expected.as_deref(), Some("integer"));
        assert_eq!(errors[0].got.as_deref(), Some("str \"abc\""));
        assert_eq!((errors[0].line, errors[0].column), (1, 7));
        assert_eq!(errors[1].message, "unexpected null value");
        assert_eq!(errors[1].path, "name");
    }

    #[test]
    fn test_empty_input_is_valid() {
        let report = validate("", Schema::map().key("a", Schema::int().required()), ValidationOptions::default());
        assert!(report.is_empty());
    }

    #[test]
    fn test_null_root_is_type_checked() {
        let mut builder = YamlDocument::builder();
        let root = builder.null();
        let document = builder.finish(root);

        let report = Validator::new(Schema::map()).validate_document(&document);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].kind, DiagnosticKind::UnexpectedNull);

        let nullable = Validator::new(Schema::map().nullable()).validate_document(&document);
        assert!(nullable.is_empty());
    }

    #[test]
    fn test_sequence_bounds_and_items() {
        let schema = Schema::sequence().min_items(3).items(Schema::int());
        let report = validate("- 1\n- x\n", schema, ValidationOptions::default());
        let messages: Vec<_> = report.errors().iter().map(|d| (d.message.as_str(), d.path.as_str())).collect();
        assert_eq!(messages, vec![("too few items", ""), ("type mismatch", "[1]")]);
        assert_eq!(report.errors()[0].expected.as_deref(), Some("at least 3"));
        assert_eq!(report.errors()[0].got.as_deref(), Some("2"));
    }

    #[test]
    fn test_deprecated_does_not_block() {
        let schema = Schema::map().key("old", Schema::int().deprecated("true"));
        let report = validate("old: nope\n", schema, ValidationOptions::default());
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].message, "this field is deprecated");
        assert_eq!(report.errors().len(), 1);
    }
}
