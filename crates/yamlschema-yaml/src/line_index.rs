//! Conversion from scanner offsets to line/column positions.

use crate::Position;

/// A newline in the source, recorded both as byte and char offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineBreak {
    byte: usize,
    char: usize,
}

/// Line index over a source text.
///
/// `yaml-rust2` reports positions as char offsets. Diagnostics use 1-based
/// lines and 1-based *byte* columns, so the index keeps both offsets of
/// every line break and walks at most one line to convert a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_breaks: Vec<LineBreak>,
    total_chars: usize,
}

impl LineIndex {
    /// Scan the content once and record every `\n`.
    ///
    /// ```
    /// use yamlschema_yaml::{LineIndex, Position};
    ///
    /// let text = "a: 1\nbé: 2";
    /// let index = LineIndex::new(text);
    /// assert_eq!(index.position(text, 5), Position::new(2, 1));
    /// // `é` is two bytes wide
    /// assert_eq!(index.position(text, 8), Position::new(2, 5));
    /// ```
    pub fn new(content: &str) -> Self {
        let mut line_breaks = Vec::new();
        let mut total_chars = 0;
        for (char_idx, (byte_idx, ch)) in content.char_indices().enumerate() {
            if ch == '\n' {
                line_breaks.push(LineBreak {
                    byte: byte_idx,
                    char: char_idx,
                });
            }
            total_chars = char_idx + 1;
        }
        LineIndex {
            line_breaks,
            total_chars,
        }
    }

    /// Number of lines; a text without newlines has one.
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }

    /// Byte offset of the char at `char_offset`, clamped to the end of the text.
    pub fn byte_offset(&self, content: &str, char_offset: usize) -> usize {
        let (_, line_start) = self.line_start(char_offset);
        let skip = char_offset.min(self.total_chars) - line_start.char;
        line_start.byte
            + content[line_start.byte..]
                .chars()
                .take(skip)
                .map(char::len_utf8)
                .sum::<usize>()
    }

    /// 1-based line and 1-based byte column of a char offset.
    ///
    /// Offsets past the end of the text are clamped to its end.
    pub fn position(&self, content: &str, char_offset: usize) -> Position {
        let (row, line_start) = self.line_start(char_offset);
        let byte = self.byte_offset(content, char_offset);
        Position::new(row + 1, byte - line_start.byte + 1)
    }

    /// Zero-based row of `char_offset` and the offsets where that row starts.
    fn line_start(&self, char_offset: usize) -> (usize, LineBreak) {
        let char_offset = char_offset.min(self.total_chars);
        // A newline belongs to the line it terminates.
        let row = self.line_breaks.partition_point(|lb| lb.char < char_offset);
        let start = if row == 0 {
            LineBreak { byte: 0, char: 0 }
        } else {
            let lb = self.line_breaks[row - 1];
            LineBreak {
                byte: lb.byte + 1,
                char: lb.char + 1,
            }
        };
        (row, start)
    }
}
