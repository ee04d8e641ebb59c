use super::ValueValidator;
use crate::context::ValidationContext;
use crate::diagnostic::{bracketed, Diagnostic, DiagnosticKind};
use yamlschema_yaml::YamlNode;

/// Checks URL scheme rules and, when a scheme is present, that the value
/// parses as a URL
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    pub require_scheme: bool,
    /// Empty means any scheme
    pub allowed_schemes: Vec<String>,
}

impl UrlValidator {
    pub fn new(require_scheme: bool, allowed_schemes: Vec<String>) -> Self {
        Self {
            require_scheme,
            allowed_schemes,
        }
    }
}

/// The scheme of `value` when it starts with `[A-Za-z][A-Za-z0-9+.-]*://`
/// and something follows the `://`.
fn scheme_of(value: &str) -> Option<&str> {
    let end = value.find(':')?;
    let scheme = &value[..end];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic()
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }
    let rest = value[end + 1..].strip_prefix("//")?;
    (!rest.is_empty()).then_some(scheme)
}

impl ValueValidator for UrlValidator {
    fn validate(&self, node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        let value = node.value();
        let scheme = scheme_of(value);

        let Some(scheme) = scheme else {
            if self.require_scheme {
                ctx.add(
                    Diagnostic::error(DiagnosticKind::InvalidUrl, "URL must include scheme")
                        .with_path(path)
                        .at(node)
                        .with_got(value),
                );
            }
            return;
        };

        if !self.allowed_schemes.is_empty() && !self.allowed_schemes.iter().any(|s| s == scheme) {
            ctx.add(
                Diagnostic::error(DiagnosticKind::InvalidUrl, "URL scheme not allowed")
                    .with_path(path)
                    .at(node)
                    .with_got(scheme)
                    .with_expected(format!("one of {}", bracketed(&self.allowed_schemes))),
            );
            return;
        }

        if let Err(err) = url::Url::parse(value) {
            ctx.add(
                Diagnostic::error(DiagnosticKind::InvalidUrl, "invalid URL")
                    .with_path(path)
                    .at(node)
                    .with_got(format!("{} ({})", value, err)),
            );
        }
    }
}
