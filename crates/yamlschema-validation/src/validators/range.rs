use super::ValueValidator;
use crate::context::ValidationContext;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use yamlschema_yaml::YamlNode;
use yamlschema_yaml::scalar::{parse_int, parse_special_float};

/// Bounds a numeric value, inclusive
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeValidator {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

/// Read scalar text as a number: special floats, anything `f64` parses,
/// then signed `0x`/`0o`/`0b` integers.
pub(crate) fn numeric_value(text: &str) -> Option<f64> {
    if let Some(special) = parse_special_float(text) {
        return Some(special);
    }
    if let Ok(value) = text.parse::<f64>() {
        return Some(value);
    }
    parse_int(text).map(|i| i as f64)
}

/// Render a number the way it appears in messages: `5`, `1.5`, `+Inf`
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

impl ValueValidator for RangeValidator {
    fn validate(&self, node: YamlNode<'_>, path: &str, ctx: &mut ValidationContext) {
        let Some(value) = numeric_value(node.value()) else {
            ctx.add(
                Diagnostic::error(DiagnosticKind::NotNumeric, "expected numeric value")
                    .with_path(path)
                    .at(node)
                    .with_got(node.value()),
            );
            return;
        };

        if let Some(min) = self.min
            && value < min
        {
            ctx.add(
                Diagnostic::error(DiagnosticKind::NumberOutOfRange, "value below minimum")
                    .with_path(path)
                    .at(node)
                    .with_got(format_number(value))
                    .with_expected(format!(">= {}", format_number(min))),
            );
        }

        if let Some(max) = self.max
            && value > max
        {
            ctx.add(
                Diagnostic::error(DiagnosticKind::NumberOutOfRange, "value above maximum")
                    .with_path(path)
                    .at(node)
                    .with_got(format_number(value))
                    .with_expected(format!("<= {}", format_number(max))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_value_forms() {
        assert_eq!(numeric_value("42"), Some(42.0));
        assert_eq!(numeric_value("0x2A"), Some(42.0));
        assert_eq!(numeric_value("-0o52"), Some(-42.0));
        assert_eq!(numeric_value("0b101010"), Some(42.0));
        assert_eq!(numeric_value("2.5e1"), Some(25.0));
        assert_eq!(numeric_value("-.inf"), Some(f64::NEG_INFINITY));
        assert_eq!(numeric_value("abc"), None);
        assert_eq!(numeric_value(""), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(f64::INFINITY), "+Inf");
    }
}
