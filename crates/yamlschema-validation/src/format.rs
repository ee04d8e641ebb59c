//! Source-context rendering of diagnostics.
//!
//! Columns in diagnostics are 1-based byte offsets. To draw a caret under
//! the right character, the line is re-rendered with tabs expanded to
//! [`TAB_WIDTH`]-column stops and the byte column is mapped to a visual
//! column, one per Unicode scalar value.

use crate::diagnostic::Diagnostic;
use std::fmt::Write;

/// Tab stop width used when rendering source lines
pub const TAB_WIDTH: usize = 4;

/// A source line prepared for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The line with tabs expanded
    pub text: String,
    /// 1-based visual column of the caret, 0 for none
    pub caret_column: usize,
    /// Visual width of `text`
    pub width: usize,
}

/// Expand tabs in `line` and map the 1-based `byte_column` to a visual column.
///
/// The caret goes before the first character whose byte offset is at or
/// after `byte_column - 1`; a column inside a multi-byte character therefore
/// lands on the character that follows it. Columns past the end clamp to one
/// past the last character.
/// Byte column 0 means no caret.
pub fn render_line_with_caret(line: &str, byte_column: usize) -> RenderedLine {
    let byte_column = byte_column.min(line.len() + 1);
    let mut text = String::with_capacity(line.len() + 16);
    let mut visual = 0;
    let mut caret_column = 0;

    for (byte_pos, ch) in line.char_indices() {
        if caret_column == 0 && byte_column > 0 && byte_column - 1 <= byte_pos {
            caret_column = visual + 1;
        }
        if ch == '\t' {
            let spaces = TAB_WIDTH - visual % TAB_WIDTH;
            text.extend(std::iter::repeat_n(' ', spaces));
            visual += spaces;
        } else {
            text.push(ch);
            visual += 1;
        }
    }

    if caret_column == 0 && byte_column > 0 {
        caret_column = visual + 1;
    }

    RenderedLine {
        text,
        caret_column,
        width: visual,
    }
}

/// Render a diagnostic with up to one line of context on each side.
///
/// `lines` are the source lines without terminators. Diagnostics without a
/// known line, or with a line past the end, render as the header only.
pub fn format_diagnostic(diagnostic: &Diagnostic, lines: &[&str]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", diagnostic);

    let line_number = diagnostic.line;
    if line_number == 0 || line_number > lines.len() {
        return out;
    }
    let index = line_number - 1;

    if index > 0 {
        let previous = render_line_with_caret(lines[index - 1], 0);
        let _ = writeln!(out, "  {:4} | {}", line_number - 1, previous.text);
    }

    let current = render_line_with_caret(lines[index], diagnostic.column);
    let _ = writeln!(out, "> {:4} | {}", line_number, current.text);

    if current.caret_column > 0 {
        let caret = current.caret_column.min(current.width + 1);
        let _ = writeln!(out, "       | {}^", " ".repeat(caret - 1));
    }

    if let Some(next) = lines.get(index + 1) {
        let next = render_line_with_caret(next, 0);
        let _ = writeln!(out, "  {:4} | {}", line_number + 1, next.text);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use yamlschema_yaml::Position;

    #[test]
    fn test_tab_expansion_and_caret() {
        let rendered = render_line_with_caret("ab\tcd", 4);
        assert_eq!(rendered.text, "ab  cd");
        assert_eq!(rendered.caret_column, 5);
        assert_eq!(rendered.width, 6);
    }

    #[test]
    fn test_caret_inside_multibyte_character() {
        // "é" spans bytes 2..=3; column 3 is its second byte
        assert_eq!(render_line_with_caret("aéb", 2).caret_column, 2);
        assert_eq!(render_line_with_caret("aéb", 3).caret_column, 3);
        assert_eq!(render_line_with_caret("aéb", 4).caret_column, 3);
    }

    #[test]
    fn test_caret_clamps_and_zero() {
        assert_eq!(render_line_with_caret("abc", 99).caret_column, 4);
        assert_eq!(render_line_with_caret("abc", 0).caret_column, 0);
        assert_eq!(render_line_with_caret("", 1).caret_column, 1);
    }

    #[test]
    fn test_format_with_context() {
        let lines = ["name: app", "port: abc", "debug: true"];
        let diagnostic = Diagnostic::error(DiagnosticKind::TypeMismatch, "type mismatch")
            .with_path("port")
            .at_position(Position::new(2, 7))
            .with_expected("integer")
            .with_got("str \"abc\"");
        let expected = "\
[ERROR] line 2:7: type mismatch (expected integer, got str \"abc\") (path: port)
     1 | name: app
>    2 | port: abc
       |       ^
     3 | debug: true
";
        assert_eq!(format_diagnostic(&diagnostic, &lines), expected);
        assert_eq!(format_diagnostic(&diagnostic, &lines), expected);
    }

    #[test]
    fn test_format_without_position() {
        let diagnostic = Diagnostic::error(DiagnosticKind::ParseError, "yaml: no document found").with_path("doc[0]");
        assert_eq!(
            format_diagnostic(&diagnostic, &["a"]),
            "[ERROR] yaml: no document found (path: doc[0])\n"
        );
        let far = diagnostic.at_position(Position::new(9, 1));
        assert_eq!(format_diagnostic(&far, &["a"]).lines().count(), 1);
    }
}
