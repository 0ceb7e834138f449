use crate::statement::SEPARATOR;

/// What kind of text the scan position is inside.
///
/// A single tagged state rather than independent flags, so a position can
/// never be inside a line comment and a block comment at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    #[default]
    Normal,
    InLineComment,
    InBlockComment,
    InSingleQuotedString,
    InDoubleQuotedString,
}

/// Result of a single lex step: the state after the step, how many
/// characters it consumed, and whether it closed a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: LexState,
    pub match_len: usize,
    pub separator: bool,
}

impl Step {
    fn single(state: LexState) -> Self {
        Self {
            state,
            match_len: 1,
            separator: false,
        }
    }

    fn pair(state: LexState) -> Self {
        Self {
            state,
            match_len: 2,
            separator: false,
        }
    }

    fn separator() -> Self {
        Self {
            state: LexState::Normal,
            match_len: 1,
            separator: true,
        }
    }
}

impl LexState {
    pub fn is_normal(self) -> bool {
        self == Self::Normal
    }

    /// Advance over the character `c`.
    ///
    /// `prev` is the character immediately before `c` in the buffer and
    /// `lookahead` the one after it. Transitions are tried in priority order:
    /// comment openers, block comment closer, quotes, separator.
    pub fn step(self, prev: Option<char>, c: char, lookahead: Option<char>) -> Step {
        use LexState::*;

        let escaped = prev == Some('\\');
        match (self, c, lookahead) {
            (Normal, '/', Some('*')) => Step::pair(InBlockComment),
            (Normal, '-', Some('-')) => Step::pair(InLineComment),
            (InBlockComment, '*', Some('/')) => Step::pair(Normal),
            (InLineComment, '\n', _) => Step::single(Normal),
            (InLineComment | InBlockComment, _, _) => Step::single(self),
            (Normal, '\'', _) if !escaped => Step::single(InSingleQuotedString),
            (InSingleQuotedString, '\'', _) if !escaped => Step::single(Normal),
            (Normal, '"', _) if !escaped => Step::single(InDoubleQuotedString),
            (InDoubleQuotedString, '"', _) if !escaped => Step::single(Normal),
            (Normal, SEPARATOR, _) => Step::separator(),
            _ => Step::single(self),
        }
    }
}
