//! SQL Parser
//!
//! Composes the tokenizer and the mutation engine into a single entry
//! point.

use tracing::debug;

use crate::ast::{Ast, NodeKind};
use crate::config::ParserConfig;
use crate::engine::MutationEngine;
use crate::error::Result;
use crate::lexer::{TokenStream, Tokenizer};

/// SQL Parser.
///
/// ```
/// use oxide_sqltree::Parser;
///
/// let ast = Parser::default().parse("SELECT a FROM t; SELECT b FROM u").unwrap();
/// assert_eq!(ast.statements().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    tokenizer: Tokenizer,
    engine: MutationEngine,
}

impl Parser {
    /// Creates a parser from its two stages.
    #[must_use]
    pub const fn new(tokenizer: Tokenizer, engine: MutationEngine) -> Self {
        Self { tokenizer, engine }
    }

    /// Creates a parser with the built-in rules and the given settings.
    #[must_use]
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(
            Tokenizer::new(config.keyword_table()),
            MutationEngine::default().with_max_passes(config.max_passes),
        )
    }

    /// Returns the tokenizer.
    #[must_use]
    pub const fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Returns the mutation engine.
    #[must_use]
    pub const fn engine(&self) -> &MutationEngine {
        &self.engine
    }

    /// Tokenizes `sql` without parsing it.
    ///
    /// # Errors
    ///
    /// Returns a lexing error at the first character no rule matches.
    pub fn tokenize(&self, sql: &str) -> Result<TokenStream> {
        Ok(self.tokenizer.tokenize(sql)?)
    }

    /// Parses `sql` into a tree.
    ///
    /// The statements are the root's children, see [`Ast::statements`].
    /// Spans no rule recognizes are left as they are.
    ///
    /// # Errors
    ///
    /// Returns a lexing error, a parsing error raised by a grammar rule, or
    /// an invariant violation.
    pub fn parse(&self, sql: &str) -> Result<Ast> {
        let tokens = self.tokenize(sql)?;
        let mut ast = Ast::from_tokens(tokens);
        self.engine.run(&mut ast)?;
        debug!(statements = ast.statements().len(), "Parsed SQL");
        Ok(ast)
    }

    /// Parses `sql` and requires every statement to be one of `expected`.
    ///
    /// # Errors
    ///
    /// Fails like [`Parser::parse`], or with a parsing error located at the
    /// first statement of another kind.
    pub fn parse_expecting(&self, sql: &str, expected: &[NodeKind]) -> Result<Ast> {
        let ast = self.parse(sql)?;
        if let Some(&unexpected) = ast
            .statements()
            .iter()
            .find(|&&id| !expected.contains(&ast.kind(id)))
        {
            let names: Vec<&str> = expected.iter().map(|kind| kind.name()).collect();
            return Err(ast
                .error_at(
                    unexpected,
                    format!(
                        "unexpected node of kind {}, expected one of [{}]",
                        ast.kind(unexpected),
                        names.join(", ")
                    ),
                )
                .into());
        }
        Ok(ast)
    }
}

/// Parses `sql` with the default parser.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse_sql(sql: &str) -> Result<Ast> {
    Parser::default().parse(sql)
}

/// Parses `sql` with the default parser, allowing only `expected` kinds.
///
/// # Errors
///
/// See [`Parser::parse_expecting`].
pub fn parse_sql_expecting(sql: &str, expected: &[NodeKind]) -> Result<Ast> {
    Parser::default().parse_expecting(sql, expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::lexer::TokenKind;

    #[test]
    fn test_expected_kinds() {
        let ast = parse_sql_expecting("SELECT a FROM t;", &[NodeKind::Select]).unwrap();
        assert_eq!(ast.statements().len(), 1);
    }

    #[test]
    fn test_unexpected_kind() {
        let err = parse_sql_expecting("SELECT a FROM t WHERE", &[NodeKind::Select]);
        assert!(matches!(err, Err(Error::Parsing(_))));

        let err = parse_sql_expecting("a = 1", &[NodeKind::Select, NodeKind::Update]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected node of kind Operation, expected one of [Select, Update] at line 0, offset 0"
        );
    }

    #[test]
    fn test_lexing_error_surfaces() {
        let err = parse_sql("SELECT @").unwrap_err();
        assert!(matches!(err, Error::Lexing(_)));
    }

    #[test]
    fn test_custom_keywords_from_config() {
        let mut config = ParserConfig::default();
        config.keywords.insert("ILIKE".to_owned(), TokenKind::Like);
        let ast = Parser::from_config(&config)
            .parse("SELECT a FROM t WHERE a ILIKE 'x%'")
            .unwrap();
        assert_eq!(ast.kind(ast.statements()[0]), NodeKind::Select);
    }

    #[test]
    fn test_empty_input() {
        let ast = parse_sql("").unwrap();
        assert!(ast.statements().is_empty());
    }
}
