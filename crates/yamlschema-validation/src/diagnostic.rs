//! Validation diagnostics and their collector.
//!
//! A [`Diagnostic`] is one finding of a validation run: a severity, a
//! structured [`DiagnosticKind`] with a stable code, the instance path, the
//! 1-based source position and a human message with optional "got" and
//! "expected" details. The [`DiagnosticCollector`] buckets findings into
//! errors and warnings while keeping insertion order inside each bucket.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use yamlschema_yaml::{Position, YamlNode};

/// How serious a diagnostic is. Warnings sort before errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Structured kind of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    UnresolvedAlias,
    Deprecated,
    UnexpectedNull,
    TypeMismatch,
    UnknownKey,
    MissingRequired,
    DefaultApplied,
    AnyOfUnsatisfied,
    ExactlyOneOf,
    MutuallyExclusive,
    ConditionalRequired,
    ConditionalForbidden,
    ItemCount,
    InvalidEnumValue,
    PatternMismatch,
    NotNumeric,
    NumberOutOfRange,
    EmptyValue,
    LengthInvalid,
    InvalidUrl,
    TypeNotAllowed,
    InvalidKey,
    /// Anything raised by a validator outside this crate
    Other,
}

impl DiagnosticKind {
    /// Get the error code for this kind
    pub fn error_code(&self) -> &'static str {
        match self {
            DiagnosticKind::ParseError => "Y-1-01",
            DiagnosticKind::UnresolvedAlias => "Y-1-02",
            DiagnosticKind::Deprecated => "Y-1-03",
            DiagnosticKind::UnexpectedNull => "Y-1-04",
            DiagnosticKind::TypeMismatch => "Y-1-05",
            DiagnosticKind::UnknownKey => "Y-1-06",
            DiagnosticKind::MissingRequired => "Y-1-07",
            DiagnosticKind::DefaultApplied => "Y-1-08",
            DiagnosticKind::AnyOfUnsatisfied => "Y-1-09",
            DiagnosticKind::ExactlyOneOf => "Y-1-10",
            DiagnosticKind::MutuallyExclusive => "Y-1-11",
            DiagnosticKind::ConditionalRequired => "Y-1-12",
            DiagnosticKind::ConditionalForbidden => "Y-1-13",
            DiagnosticKind::ItemCount => "Y-1-14",
            DiagnosticKind::InvalidEnumValue => "Y-1-15",
            DiagnosticKind::PatternMismatch => "Y-1-16",
            DiagnosticKind::NotNumeric => "Y-1-17",
            DiagnosticKind::NumberOutOfRange => "Y-1-18",
            DiagnosticKind::EmptyValue => "Y-1-19",
            DiagnosticKind::LengthInvalid => "Y-1-20",
            DiagnosticKind::InvalidUrl => "Y-1-21",
            DiagnosticKind::TypeNotAllowed => "Y-1-22",
            DiagnosticKind::InvalidKey => "Y-1-23",
            DiagnosticKind::Other => "Y-1-99",
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Instance path, e.g. `doc[2].spec.containers[0].image`
    pub path: String,
    /// 1-based line, 0 if unknown
    pub line: usize,
    /// 1-based byte column, 0 if unknown
    pub column: usize,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub got: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            path: String::new(),
            line: 0,
            column: 0,
            message: message.into(),
            got: None,
            expected: None,
        }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, message)
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Position the diagnostic at a node
    pub fn at(self, node: YamlNode<'_>) -> Self {
        self.at_position(node.position())
    }

    pub fn at_position(mut self, position: Position) -> Self {
        self.line = position.line;
        self.column = position.column;
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Get the error code for this diagnostic
    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    /// Machine-readable form, including the error code
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "severity": self.severity,
            "kind": self.kind,
            "code": self.error_code(),
            "path": self.path,
            "line": self.line,
            "column": self.column,
            "message": self.message,
        });
        if let Some(got) = &self.got {
            obj["got"] = json!(got);
        }
        if let Some(expected) = &self.expected {
            obj["expected"] = json!(expected);
        }
        obj
    }

    /// Sort key: position, then errors before warnings
    pub(crate) fn position_key(&self) -> (usize, usize, Reverse<Severity>) {
        (self.line, self.column, Reverse(self.severity))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// `[ERROR] line 3:5: type mismatch (expected integer, got str "abc") (path: spec.port)`
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.severity)?;
        match (self.line, self.column) {
            (0, _) => {}
            (line, 0) => write!(f, "line {}: ", line)?,
            (line, column) => write!(f, "line {}:{}: ", line, column)?,
        }
        write!(f, "{}", self.message)?;
        match (non_empty(&self.expected), non_empty(&self.got)) {
            (Some(expected), Some(got)) => write!(f, " (expected {}, got {})", expected, got)?,
            (None, Some(got)) => write!(f, " (got {})", got)?,
            _ => {}
        }
        write!(f, " (path: {})", self.path)
    }
}

/// Collector for diagnostics, split by severity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollector {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic to the bucket of its severity
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    /// Check if any errors were collected (warnings don't count)
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// All errors followed by all warnings
    pub fn all(&self) -> Vec<&Diagnostic> {
        self.errors.iter().chain(self.warnings.iter()).collect()
    }

    /// All diagnostics ordered by position; ties keep `all()` order
    pub fn sorted_by_position(&self) -> Vec<&Diagnostic> {
        let mut all = self.all();
        all.sort_by_key(|d| d.position_key());
        all
    }

    /// Rebuild the collector in position order
    pub fn sort_by_position(&mut self) {
        let mut all: Vec<Diagnostic> = self.errors.drain(..).chain(self.warnings.drain(..)).collect();
        all.sort_by_key(|d| d.position_key());
        for diagnostic in all {
            self.add(diagnostic);
        }
    }
}

/// Render a list the way `[a b c]` reads in messages
pub(crate) fn bracketed<S: AsRef<str>>(items: &[S]) -> String {
    let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    format!("[{}]", joined.join(" "))
}

/// Double-quote a value for messages.
///
/// Control characters use the short escapes (`\n`, `\t`, ...) or `\xHH`
/// below 0x80 and `\uHHHH` / `\UHHHHHHHH` above; other characters are kept.
pub(crate) fn quoted(value: &str) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            ' ' => out.push(' '),
            c if c.is_control() || c.is_whitespace() || c == '\u{feff}' => {
                // Writing to a String cannot fail
                let _ = match u32::from(c) {
                    code if code < 0x80 => write!(out, "\\x{:02x}", code),
                    code if code < 0x10000 => write!(out, "\\u{:04x}", code),
                    code => write!(out, "\\U{:08x}", code),
                };
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
