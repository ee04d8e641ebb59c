use super::ValueValidator;
use crate::context::ValidationContext;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use yamlschema_yaml::{NodeKind, YamlNode};

/// Bounds the length of a value, inclusive.
///
/// Scalars are measured in bytes, sequences in items and mappings in
/// entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthValidator {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl ValueValidator for LengthValidator {
    fn validate(&self, node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        let length = match node.kind() {
            NodeKind::Scalar => node.value().len(),
            NodeKind::Map | NodeKind::Sequence => node.len(),
            NodeKind::Null | NodeKind::Alias => 0,
        };

        if let Some(min) = self.min
            && length < min
        {
            ctx.add(
                Diagnostic::error(DiagnosticKind::LengthInvalid, "length below minimum")
                    .with_path(path)
                    .at(node)
                    .with_got(length.to_string())
                    .with_expected(format!(">= {}", min)),
            );
        }

        if let Some(max) = self.max
            && length > max
        {
            ctx.add(
                Diagnostic::error(DiagnosticKind::LengthInvalid, "length above maximum")
                    .with_path(path)
                    .at(node)
                    .with_got(length.to_string())
                    .with_expected(format!("<= {}", max)),
            );
        }
    }
}
