//! Token types for the SQL tokenizer.

use serde::{Deserialize, Serialize};

use super::Position;

/// The kind of a token.
///
/// The set is closed: custom keyword tables map additional words onto these
/// kinds rather than adding new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Trivia
    Whitespace,
    Comment,

    // Punctuation
    Dot,
    Comma,
    Semicolon,
    BracketOpen,
    BracketClose,
    Star,

    // Values and names
    Symbol,
    StringLiteral,
    NumericLiteral,
    PreparedArgument,
    Operator,

    // Keywords
    Select,
    Distinct,
    As,
    From,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Natural,
    On,
    Using,
    Where,
    And,
    Or,
    Not,
    Like,
    Is,
    In,
    Null,
    Order,
    By,
    Asc,
    Desc,
    Group,
    Having,
    Set,
    Update,
}

impl TokenKind {
    /// Returns the name used in token dumps (e.g. `STRING_LITERAL`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Whitespace => "WHITESPACE",
            Self::Comment => "COMMENT",
            Self::Dot => "DOT",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMICOLON",
            Self::BracketOpen => "BRACKET_OPEN",
            Self::BracketClose => "BRACKET_CLOSE",
            Self::Star => "STAR",
            Self::Symbol => "SYMBOL",
            Self::StringLiteral => "STRING_LITERAL",
            Self::NumericLiteral => "NUMERIC_LITERAL",
            Self::PreparedArgument => "PREPARED_ARGUMENT",
            Self::Operator => "OPERATOR",
            Self::Select => "SELECT",
            Self::Distinct => "DISTINCT",
            Self::As => "AS",
            Self::From => "FROM",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::Natural => "NATURAL",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Where => "WHERE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Like => "LIKE",
            Self::Is => "IS",
            Self::In => "IN",
            Self::Null => "NULL",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Group => "GROUP",
            Self::Having => "HAVING",
            Self::Set => "SET",
            Self::Update => "UPDATE",
        }
    }

    /// Returns true for whitespace and comments.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Returns true for reserved words.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::Distinct
                | Self::As
                | Self::From
                | Self::Join
                | Self::Inner
                | Self::Left
                | Self::Right
                | Self::Full
                | Self::Outer
                | Self::Cross
                | Self::Natural
                | Self::On
                | Self::Using
                | Self::Where
                | Self::And
                | Self::Or
                | Self::Not
                | Self::Like
                | Self::Is
                | Self::In
                | Self::Null
                | Self::Order
                | Self::By
                | Self::Asc
                | Self::Desc
                | Self::Group
                | Self::Having
                | Self::Set
                | Self::Update
        )
    }

    /// Returns true for the words that may precede `JOIN`.
    #[must_use]
    pub const fn is_join_modifier(self) -> bool {
        matches!(
            self,
            Self::Inner | Self::Left | Self::Right | Self::Full | Self::Outer | Self::Cross | Self::Natural
        )
    }
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexical unit with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub lexeme: String,
    /// Zero-based line of the first character.
    pub line: usize,
    /// Zero-based column of the first character.
    pub column: usize,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line: position.line,
            column: position.column,
        }
    }

    /// Returns the position of the first character.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Returns true if the token has the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Returns the lexeme with identifier quoting removed.
    ///
    /// Backtick-quoted symbols lose their backticks (doubled backticks are
    /// unescaped); everything else is returned unchanged.
    #[must_use]
    pub fn unquoted(&self) -> String {
        if self.kind == TokenKind::Symbol && self.lexeme.len() >= 2 && self.lexeme.starts_with('`') {
            self.lexeme[1..self.lexeme.len() - 1].replace("``", "`")
        } else {
            self.lexeme.clone()
        }
    }
}

/// An immutable sequence of tokens together with the SQL they came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenStream {
    sql: String,
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Creates a token stream over `sql`.
    #[must_use]
    pub fn new(sql: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            sql: sql.into(),
            tokens,
        }
    }

    /// Returns the original SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the tokens as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns an iterator over the tokens.
    pub fn iter(&self) -> core::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Returns the number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns a stream with the whitespace tokens removed.
    #[must_use]
    pub fn without_whitespace(&self) -> Self {
        self.filtered(|token| token.kind != TokenKind::Whitespace)
    }

    /// Returns a stream with the comment tokens removed.
    #[must_use]
    pub fn without_comments(&self) -> Self {
        self.filtered(|token| token.kind != TokenKind::Comment)
    }

    fn filtered(&self, keep: impl Fn(&Token) -> bool) -> Self {
        Self {
            sql: self.sql.clone(),
            tokens: self.tokens.iter().filter(|t| keep(t)).cloned().collect(),
        }
    }

    /// Renders one `line,offset,KIND` line per non-whitespace token.
    #[must_use]
    pub fn dump(&self) -> String {
        self.tokens
            .iter()
            .filter(|token| token.kind != TokenKind::Whitespace)
            .map(|token| format!("{},{},{}", token.line, token.column, token.kind))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = core::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, lexeme: &str, column: usize) -> Token {
        Token::new(kind, lexeme, Position::new(0, column))
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::StringLiteral.name(), "STRING_LITERAL");
        assert_eq!(TokenKind::Select.name(), "SELECT");
        assert_eq!(TokenKind::BracketOpen.to_string(), "BRACKET_OPEN");
    }

    #[test]
    fn test_kind_classification() {
        assert!(TokenKind::Where.is_keyword());
        assert!(!TokenKind::Symbol.is_keyword());
        assert!(TokenKind::Comment.is_trivia());
        assert!(TokenKind::Left.is_join_modifier());
        assert!(!TokenKind::Join.is_join_modifier());
    }

    #[test]
    fn test_unquoted_symbol() {
        assert_eq!(token(TokenKind::Symbol, "`my``col`", 0).unquoted(), "my`col");
        assert_eq!(token(TokenKind::Symbol, "plain", 0).unquoted(), "plain");
        assert_eq!(token(TokenKind::StringLiteral, "'x'", 0).unquoted(), "'x'");
    }

    #[test]
    fn test_stream_filters() {
        let stream = TokenStream::new(
            "a -- c",
            vec![
                token(TokenKind::Symbol, "a", 0),
                token(TokenKind::Whitespace, " ", 1),
                token(TokenKind::Comment, "-- c", 2),
            ],
        );
        assert_eq!(stream.without_whitespace().len(), 2);
        assert_eq!(stream.without_comments().len(), 2);
        assert_eq!(stream.without_whitespace().without_comments().len(), 1);
        assert_eq!(stream.without_comments().sql(), "a -- c");
    }

    #[test]
    fn test_stream_dump_skips_whitespace() {
        let stream = TokenStream::new(
            "a -- c",
            vec![
                token(TokenKind::Symbol, "a", 0),
                token(TokenKind::Whitespace, " ", 1),
                token(TokenKind::Comment, "-- c", 2),
            ],
        );
        assert_eq!(stream.dump(), "0,0,SYMBOL\n0,2,COMMENT");
    }

    #[test]
    fn test_kind_deserializes_from_dump_name() {
        let kind: TokenKind = serde_json::from_str("\"NUMERIC_LITERAL\"").unwrap();
        assert_eq!(kind, TokenKind::NumericLiteral);
    }
}
