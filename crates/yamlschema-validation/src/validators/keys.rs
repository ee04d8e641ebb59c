//! Bundled key validators.

use super::KeyValidator;
use crate::context::ValidationContext;
use crate::diagnostic::{quoted, Diagnostic, DiagnosticKind};
use regex::Regex;
use yamlschema_yaml::YamlNode;

/// Key names must match a regular expression
#[derive(Debug, Clone)]
pub struct PatternKeyValidator {
    pub pattern: Regex,
    pub message: Option<String>,
}

impl PatternKeyValidator {
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

impl KeyValidator for PatternKeyValidator {
    fn validate_key(&self, key: &str, key_node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        if self.pattern.is_match(key) {
            return;
        }
        let message = match &self.message {
            Some(message) => message.clone(),
            None => format!("key does not match pattern {}", self.pattern.as_str()),
        };
        ctx.add(
            Diagnostic::error(DiagnosticKind::InvalidKey, message)
                .with_path(path)
                .at(key_node)
                .with_got(key),
        );
    }
}

/// Rejects a fixed set of key names
#[derive(Debug, Clone, Default)]
pub struct ForbiddenKeyValidator {
    pub forbidden: Vec<String>,
    pub message: Option<String>,
}

impl ForbiddenKeyValidator {
    pub fn new<S: Into<String>>(forbidden: impl IntoIterator<Item = S>) -> Self {
        Self {
            forbidden: forbidden.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl KeyValidator for ForbiddenKeyValidator {
    fn validate_key(&self, key: &str, key_node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        if !self.forbidden.iter().any(|f| f == key) {
            return;
        }
        let message = match &self.message {
            Some(message) => message.clone(),
            None => format!("key {} is forbidden", quoted(key)),
        };
        ctx.add(
            Diagnostic::error(DiagnosticKind::InvalidKey, message)
                .with_path(path)
                .at(key_node)
                .with_got(key),
        );
    }
}

/// Bounds key length in characters, inclusive
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthKeyValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthKeyValidator {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl KeyValidator for LengthKeyValidator {
    fn validate_key(&self, key: &str, key_node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        let length = key.chars().count();

        if let Some(min) = self.min
            && length < min
        {
            ctx.add(
                Diagnostic::error(DiagnosticKind::InvalidKey, "key too short")
                    .with_path(path)
                    .at(key_node)
                    .with_got(format!("{} characters", length))
                    .with_expected(format!(">= {} characters", min)),
            );
        }

        if let Some(max) = self.max
            && length > max
        {
            ctx.add(
                Diagnostic::error(DiagnosticKind::InvalidKey, "key too long")
                    .with_path(path)
                    .at(key_node)
                    .with_got(format!("{} characters", length))
                    .with_expected(format!("<= {} characters", max)),
            );
        }
    }
}
