use super::ValueValidator;
use crate::context::ValidationContext;
use crate::diagnostic::{bracketed, Diagnostic, DiagnosticKind};
use crate::inference::{infer_type, NodeType};
use yamlschema_yaml::YamlNode;

/// The inferred type must be one of a list; a float entry accepts ints
#[derive(Debug, Clone, Default)]
pub struct OneOfTypeValidator {
    pub types: Vec<NodeType>,
}

impl OneOfTypeValidator {
    pub fn new(types: impl IntoIterator<Item = NodeType>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }
}

impl ValueValidator for OneOfTypeValidator {
    fn validate(&self, node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        let actual = infer_type(node, ctx.options());
        if self.types.iter().any(|t| t.accepts(actual)) {
            return;
        }
        let names: Vec<&str> = self.types.iter().map(NodeType::name).collect();
        ctx.add(
            Diagnostic::error(DiagnosticKind::TypeNotAllowed, "type not allowed")
                .with_path(path)
                .at(node)
                .with_got(actual.name())
                .with_expected(format!("one of {}", bracketed(&names))),
        );
    }
}
