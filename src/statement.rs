use serde::Serialize;

/// Character offset into the source buffer (Unicode scalar values, not bytes).
pub type Pos = usize;

/// The statement-terminating character.
pub const SEPARATOR: char = ';';

/// An immutable record of one SQL statement found in a buffer.
///
/// `text` is trimmed and keeps its separator when the source had one.
/// Lines and offsets are zero-indexed and refer to the original, untrimmed
/// buffer. Both line bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
    pub start_offset: Pos,
    pub end_offset: Pos,
    /// Closed by a separator scanned outside any string or comment.
    pub terminated: bool,
}

impl Statement {
    pub fn new(
        text: &str,
        start_line: usize,
        end_line: usize,
        start_offset: Pos,
        end_offset: Pos,
    ) -> Self {
        Self {
            text: text.to_string(),
            start_line,
            end_line,
            start_offset,
            end_offset,
            terminated: false,
        }
    }

    /// Mark the statement as closed by a separator.
    pub fn terminated(mut self) -> Self {
        self.terminated = true;
        self
    }

    /// True if `line` falls within `[start_line, end_line]`.
    /// Negative lines are never contained.
    pub fn contains_line(&self, line: i64) -> bool {
        match usize::try_from(line) {
            Ok(line) => self.start_line <= line && line <= self.end_line,
            Err(_) => false,
        }
    }

    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// Whether the source carried a separator for this statement.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}
