use super::ValueValidator;
use crate::context::ValidationContext;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use regex::Regex;
use yamlschema_yaml::YamlNode;

/// The raw scalar text must match a regular expression (unanchored)
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pub pattern: Regex,
    pub message: Option<String>,
}

impl PatternValidator {
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ValueValidator for PatternValidator {
    fn validate(&self, node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        let value = node.value();
        if self.pattern.is_match(value) {
            return;
        }
        let message = match &self.message {
            Some(message) => message.clone(),
            None => format!("value does not match pattern {}", self.pattern.as_str()),
        };
        ctx.add(
            Diagnostic::error(DiagnosticKind::PatternMismatch, message)
                .with_path(path)
                .at(node)
                .with_got(value),
        );
    }
}
