use super::ValueValidator;
use crate::context::ValidationContext;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use yamlschema_yaml::{NodeKind, YamlNode};

/// Rejects empty scalars, sequences and mappings
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyValidator;

impl ValueValidator for NonEmptyValidator {
    fn validate(&self, node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        let is_empty = match node.kind() {
            NodeKind::Scalar => node.value().is_empty(),
            NodeKind::Map | NodeKind::Sequence => node.is_empty(),
            NodeKind::Null | NodeKind::Alias => false,
        };
        if is_empty {
            ctx.add(
                Diagnostic::error(DiagnosticKind::EmptyValue, "value cannot be empty")
                    .with_path(path)
                    .at(node),
            );
        }
    }
}
