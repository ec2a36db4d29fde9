//! Source location tracking for tokens and tree nodes.

/// A zero-based line/column location in the source text.
///
/// `column` counts characters from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based character offset within the line.
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns the position right after `lexeme`, assuming it starts here.
    ///
    /// When the lexeme spans several lines the column restarts at the
    /// distance from its last newline.
    #[must_use]
    pub fn advance(self, lexeme: &str) -> Self {
        match lexeme.rfind('\n') {
            Some(last) => Self {
                line: self.line + lexeme.matches('\n').count(),
                column: lexeme[last + 1..].chars().count(),
            },
            None => Self {
                line: self.line,
                column: self.column + lexeme.chars().count(),
            },
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.line, self.column)
    }
}
