use crate::lexer::LexState;
use crate::statement::{Pos, Statement};

/// Accumulates the characters of the statement currently being scanned.
#[derive(Debug, Default)]
struct Accumulator {
    text: String,
    /// Line and offset of the first non-whitespace character, if any.
    start: Option<(usize, Pos)>,
}

impl Accumulator {
    fn push(&mut self, c: char, line: usize, offset: Pos) {
        if self.start.is_none() && !c.is_whitespace() {
            self.start = Some((line, offset));
        }
        self.text.push(c);
    }

    /// Emit the accumulated statement ending at `end_line`/`end_offset`,
    /// or nothing if it holds only whitespace. Resets the accumulator.
    fn take(&mut self, end_line: usize, end_offset: Pos, terminated: bool) -> Option<Statement> {
        // `start` is only set once a non-whitespace character was pushed,
        // so the trimmed text is never empty here.
        let stmt = self.start.take().map(|(start_line, start_offset)| Statement {
            text: self.text.trim().to_string(),
            start_line,
            end_line,
            start_offset,
            end_offset,
            terminated,
        });
        self.text.clear();
        stmt
    }
}

/// Split `source` into statements in a single left-to-right scan.
///
/// Separators inside string literals and comments do not split. The last
/// statement need not be terminated, and an unterminated string or comment
/// simply runs to the end of the buffer. Any input is accepted.
pub fn split_statements(source: &str) -> Vec<Statement> {
    let chars: Vec<char> = source.chars().collect();
    let mut statements = Vec::new();
    let mut acc = Accumulator::default();
    let mut state = LexState::default();
    let mut line = 0;
    let mut pos: Pos = 0;

    while pos < chars.len() {
        let prev = pos.checked_sub(1).map(|p| chars[p]);
        let step = state.step(prev, chars[pos], chars.get(pos + 1).copied());

        if step.separator {
            acc.push(chars[pos], line, pos);
            statements.extend(acc.take(line, pos, true));
        } else {
            for offset in pos..pos + step.match_len {
                acc.push(chars[offset], line, offset);
                if chars[offset] == '\n' {
                    line += 1;
                }
            }
        }

        state = step.state;
        pos += step.match_len;
    }

    statements.extend(acc.take(line, chars.len(), false));

    tracing::trace!(
        chars = chars.len(),
        statements = statements.len(),
        unclosed = !state.is_normal(),
        "segmented buffer"
    );
    statements
}

/// True if `source` holds at least two statements.
pub fn has_multiple_statements(source: &str) -> bool {
    split_statements(source).len() >= 2
}
