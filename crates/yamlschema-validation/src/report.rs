//! The outcome of a validation run.

use crate::diagnostic::{Diagnostic, DiagnosticCollector};
use crate::format::format_diagnostic;
use serde_json::json;

/// Diagnostics of one run together with the source they point into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    collector: DiagnosticCollector,
    source: String,
}

impl ValidationReport {
    pub fn new(collector: DiagnosticCollector, source: impl Into<String>) -> Self {
        Self {
            collector,
            source: source.into(),
        }
    }

    pub fn collector(&self) -> &DiagnosticCollector {
        &self.collector
    }

    pub fn errors(&self) -> &[Diagnostic] {
        self.collector.errors()
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        self.collector.warnings()
    }

    /// All errors followed by all warnings
    pub fn all(&self) -> Vec<&Diagnostic> {
        self.collector.all()
    }

    pub fn sorted_by_position(&self) -> Vec<&Diagnostic> {
        self.collector.sorted_by_position()
    }

    /// Reorder the stored diagnostics by position
    pub fn sort_by_position(&mut self) {
        self.collector.sort_by_position();
    }

    /// Only errors count; warnings never fail a run
    pub fn has_errors(&self) -> bool {
        self.collector.has_errors()
    }

    pub fn is_empty(&self) -> bool {
        self.collector.is_empty()
    }

    /// Source lines, split the way the formatter numbers them
    pub fn source_lines(&self) -> Vec<&str> {
        self.source.lines().collect()
    }

    /// Render one diagnostic with source context
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        format_diagnostic(diagnostic, &self.source_lines())
    }

    /// Render every diagnostic, each followed by a blank line
    pub fn format_all(&self, sort_by_position: bool) -> String {
        let items = if sort_by_position {
            self.sorted_by_position()
        } else {
            self.all()
        };
        let lines = self.source_lines();
        let mut out = String::new();
        for diagnostic in items {
            out.push_str(&format_diagnostic(diagnostic, &lines));
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "valid": !self.has_errors(),
            "errors": self.errors().len(),
            "warnings": self.warnings().len(),
            "diagnostics": self.all().into_iter().map(Diagnostic::to_json).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use yamlschema_yaml::Position;

    fn report() -> ValidationReport {
        let mut collector = DiagnosticCollector::new();
        collector.add(
            Diagnostic::warning(DiagnosticKind::UnknownKey, "unknown key \"x\"")
                .with_path("x")
                .at_position(Position::new(1, 1)),
        );
        collector.add(
            Diagnostic::error(DiagnosticKind::TypeMismatch, "type mismatch")
                .with_path("b")
                .at_position(Position::new(2, 4)),
        );
        collector.add(
            Diagnostic::error(DiagnosticKind::UnknownKey, "unknown key \"y\"")
                .with_path("y")
                .at_position(Position::new(1, 1)),
        );
        ValidationReport::new(collector, "x: 1\nb: q\n")
    }

    #[test]
    fn test_sorted_view_and_sort_in_place() {
        let mut report = report();
        let paths: Vec<_> = report.sorted_by_position().iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["y", "x", "b"]);
        // the view does not reorder storage
        assert_eq!(report.all()[0].path, "b");

        report.sort_by_position();
        let once = report.clone();
        report.sort_by_position();
        assert_eq!(report, once);
        assert_eq!(report.errors()[0].path, "y");
    }

    #[test]
    fn test_format_all_is_stable() {
        let report = report();
        let text = report.format_all(true);
        assert_eq!(text, report.format_all(true));
        assert!(text.starts_with("[ERROR] line 1:1: unknown key \"y\" (path: y)\n>    1 | x: 1\n"));
        assert!(text.ends_with("\n\n"));
        assert_eq!(text.matches("[ERROR]").count(), 2);
    }

    #[test]
    fn test_json_summary() {
        let value = report().to_json();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"], 2);
        assert_eq!(value["warnings"], 1);
        assert_eq!(value["diagnostics"][0]["path"], "b");
    }
}
