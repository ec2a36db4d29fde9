//! SQL tokenizer implementation.

use tracing::debug;

use super::keywords::is_symbol_char;
use super::{KeywordTable, Position, Token, TokenKind, TokenStream};
use crate::error::LexingError;

/// Converts SQL text into a [`TokenStream`].
///
/// Every byte of the input ends up in exactly one token, whitespace and
/// comments included, so concatenating the lexemes reproduces the input.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    keywords: KeywordTable,
}

impl Tokenizer {
    /// Creates a tokenizer using the given keyword/operator table.
    #[must_use]
    pub const fn new(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    /// Returns the keyword table in use.
    #[must_use]
    pub const fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Tokenizes `sql`.
    ///
    /// # Errors
    ///
    /// Returns a [`LexingError`] pointing at the first character no rule
    /// matches, including the opening quote of an unterminated string.
    pub fn tokenize(&self, sql: &str) -> Result<TokenStream, LexingError> {
        let mut scanner = Scanner::new(sql, &self.keywords);
        let mut tokens = Vec::new();
        let mut position = Position::default();
        let mut previous: Option<TokenKind> = None;

        while scanner.pos < sql.len() {
            let Some((len, kind)) = scanner.next_rule() else {
                return Err(LexingError::new(sql, position.line, position.column));
            };
            let lexeme = &sql[scanner.pos..scanner.pos + len];
            let kind = disambiguate_star(kind, lexeme, previous);

            tokens.push(Token::new(kind, lexeme, position));
            position = position.advance(lexeme);
            scanner.pos += len;
            if !kind.is_trivia() {
                previous = Some(kind);
            }
        }

        debug!(tokens = tokens.len(), "Tokenized SQL");
        Ok(TokenStream::new(sql, tokens))
    }
}

/// `*` is multiplication only after something that ends an operand;
/// elsewhere it selects all columns.
fn disambiguate_star(kind: TokenKind, lexeme: &str, previous: Option<TokenKind>) -> TokenKind {
    if kind != TokenKind::Operator || lexeme != "*" {
        return kind;
    }
    match previous {
        Some(
            TokenKind::Symbol
            | TokenKind::NumericLiteral
            | TokenKind::BracketClose
            | TokenKind::PreparedArgument,
        ) => TokenKind::Operator,
        _ => TokenKind::Star,
    }
}

/// Matches the lexing rules against the remaining input.
struct Scanner<'a> {
    input: &'a str,
    keywords: &'a KeywordTable,
    /// The current byte position.
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(input: &'a str, keywords: &'a KeywordTable) -> Self {
        Self {
            input,
            keywords,
            pos: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Tries every rule in priority order; returns byte length and kind.
    fn next_rule(&self) -> Option<(usize, TokenKind)> {
        self.scan_whitespace()
            .or_else(|| self.scan_comment())
            .or_else(|| self.scan_string())
            .or_else(|| self.keywords.longest_match(self.input, self.pos))
            .or_else(|| self.scan_number())
            .or_else(|| self.scan_backtick())
            .or_else(|| self.scan_identifier())
            .or_else(|| self.scan_prepared_argument())
    }

    fn scan_whitespace(&self) -> Option<(usize, TokenKind)> {
        let len = prefix_len(self.rest(), char::is_whitespace);
        (len > 0).then_some((len, TokenKind::Whitespace))
    }

    fn scan_comment(&self) -> Option<(usize, TokenKind)> {
        let rest = self.rest();
        if rest.starts_with('#') || rest.starts_with("--") {
            let len = rest.find('\n').unwrap_or(rest.len());
            return Some((len, TokenKind::Comment));
        }
        if let Some(body) = rest.strip_prefix("/*") {
            // An unterminated block comment runs to the end of input.
            let len = body.find("*/").map_or(rest.len(), |end| end + 4);
            return Some((len, TokenKind::Comment));
        }
        None
    }

    fn scan_string(&self) -> Option<(usize, TokenKind)> {
        let rest = self.rest();
        let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
        closing_quote(rest, quote, true).map(|len| (len, TokenKind::StringLiteral))
    }

    fn scan_number(&self) -> Option<(usize, TokenKind)> {
        let rest = self.rest();
        let digits = prefix_len(rest, |c| c.is_ascii_digit());
        if digits == 0 {
            return None;
        }
        let mut len = digits;
        if let Some(fraction) = rest[len..].strip_prefix('.') {
            let decimals = prefix_len(fraction, |c| c.is_ascii_digit());
            if decimals > 0 {
                len += 1 + decimals;
            }
        }
        Some((len, TokenKind::NumericLiteral))
    }

    fn scan_backtick(&self) -> Option<(usize, TokenKind)> {
        let rest = self.rest();
        if !rest.starts_with('`') {
            return None;
        }
        closing_quote(rest, '`', false).map(|len| (len, TokenKind::Symbol))
    }

    fn scan_identifier(&self) -> Option<(usize, TokenKind)> {
        let rest = self.rest();
        let first = rest.chars().next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        Some((prefix_len(rest, is_symbol_char), TokenKind::Symbol))
    }

    fn scan_prepared_argument(&self) -> Option<(usize, TokenKind)> {
        let rest = self.rest();
        if rest.starts_with('?') {
            return Some((1, TokenKind::PreparedArgument));
        }
        let name = rest.strip_prefix(':')?;
        let len = prefix_len(name, is_symbol_char);
        (len > 0).then_some((len + 1, TokenKind::PreparedArgument))
    }
}

/// Byte length of the longest prefix whose characters satisfy `accept`.
fn prefix_len(s: &str, accept: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, c)| !accept(*c))
        .map_or(s.len(), |(i, _)| i)
}

/// Byte length up to and including the quote closing the one `s` starts
/// with. A doubled quote is an escaped quote, as is a backslash-escaped one
/// when `backslash` is set.
fn closing_quote(s: &str, quote: char, backslash: bool) -> Option<usize> {
    let mut chars = s.char_indices().skip(1).peekable();
    while let Some((i, c)) = chars.next() {
        if backslash && c == '\\' {
            chars.next();
        } else if c == quote {
            if chars.peek().is_some_and(|(_, next)| *next == quote) {
                chars.next();
            } else {
                return Some(i + c.len_utf8());
            }
        }
    }
    None
}
