use super::ValueValidator;
use crate::context::ValidationContext;
use crate::diagnostic::{bracketed, quoted, Diagnostic, DiagnosticKind};
use yamlschema_yaml::YamlNode;

/// The raw scalar text must equal one of the allowed strings
#[derive(Debug, Clone, Default)]
pub struct EnumValidator {
    pub allowed: Vec<String>,
    /// Replaces the default `invalid value "<v>"` message
    pub message: Option<String>,
}

impl EnumValidator {
    pub fn new<S: Into<String>>(allowed: impl IntoIterator<Item = S>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ValueValidator for EnumValidator {
    fn validate(&self, node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        let value = node.value();
        if self.allowed.iter().any(|allowed| allowed == value) {
            return;
        }
        let message = match &self.message {
            Some(message) => message.clone(),
            None => format!("invalid value {}", quoted(value)),
        };
        ctx.add(
            Diagnostic::error(DiagnosticKind::InvalidEnumValue, message)
                .with_path(path)
                .at(node)
                .with_got(value)
                .with_expected(format!("one of {}", bracketed(&self.allowed))),
        );
    }
}
