use memchr::memchr_iter;

use crate::splitter::split_statements;
use crate::statement::{Pos, Statement};

/// Pick the statement an editor cursor on `cursor_line` belongs to.
///
/// A lone statement is always current, wherever the cursor is. With several
/// statements the first one whose line range contains the cursor wins, and
/// a cursor on a line no statement covers resolves to nothing so that a
/// "run current statement" command never re-runs a neighbour.
pub fn resolve_in(statements: &[Statement], cursor_line: i64) -> Option<&Statement> {
    match statements {
        [] => None,
        [only] => Some(only),
        _ => statements.iter().find(|s| s.contains_line(cursor_line)),
    }
}

/// Segment `source` and resolve the statement at the cursor.
///
/// `cursor_column` mirrors editor coordinates but does not take part in the
/// decision; line containment is enough.
pub fn resolve_at_cursor(
    source: &str,
    cursor_line: i64,
    cursor_column: i64,
) -> Option<Statement> {
    let statements = split_statements(source);
    let resolved = resolve_in(&statements, cursor_line).cloned();
    tracing::trace!(
        cursor_line,
        cursor_column,
        statements = statements.len(),
        resolved = resolved.is_some(),
        "resolved cursor"
    );
    resolved
}

/// Resolve the statement at a character offset into `source`.
pub fn resolve_at_offset(source: &str, offset: Pos) -> Option<Statement> {
    let line = line_of_offset(source, offset);
    // usize lines always fit in i64 for any buffer that fits in memory
    resolve_at_cursor(source, line as i64, 0)
}

/// Zero-indexed line of the character at `offset`.
/// Offsets past the end map to the last line.
pub fn line_of_offset(source: &str, offset: Pos) -> usize {
    let byte_pos = source
        .char_indices()
        .nth(offset)
        .map(|(b, _)| b)
        .unwrap_or(source.len());
    memchr_iter(b'\n', &source.as_bytes()[..byte_pos]).count()
}
