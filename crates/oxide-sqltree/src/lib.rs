//! # oxide-sqltree
//!
//! A SQL parser that builds its syntax tree bottom-up by local rewriting.
//!
//! This crate provides:
//! - A keyword-table driven tokenizer that keeps every byte of the input
//! - An arena-backed tree whose branches are edited through one splice
//!   primitive, with structural hashing for change detection
//! - A mutation engine applying an ordered list of grammar rules to a
//!   fixpoint
//! - Grammar rules for columns, literals, operators, conjunctions, joins,
//!   clauses and `SELECT`/`UPDATE` statements
//! - Error diagnostics rendered as an ASCII drawing of the failing location
//!
//! ## Parsing
//!
//! The token stream starts as a flat list of leaves under a root. Rules
//! repeatedly replace a run of siblings by one composite node until no rule
//! changes the tree anymore:
//!
//! ```rust
//! use oxide_sqltree::{parse_sql, NodeKind};
//!
//! let ast = parse_sql("SELECT u.name FROM users u WHERE u.id = 1").unwrap();
//! let statement = ast.statements()[0];
//! assert_eq!(ast.kind(statement), NodeKind::Select);
//! assert_eq!(ast.to_sql(statement), "SELECT u.name FROM users u WHERE u.id = 1");
//! ```
//!
//! ## Diagnostics
//!
//! Lexing and parsing errors carry the SQL and the failing location:
//!
//! ```rust
//! use oxide_sqltree::parse_sql;
//!
//! let err = parse_sql("SELECT a\nFROM t WHERE").unwrap_err();
//! let dump = err.location_dump().unwrap();
//! assert!(dump.contains(" → FROM t WHERE ← "));
//! ```

pub mod ast;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod rules;
pub mod schema;

pub use ast::{Ast, Node, NodeId, NodeKind, Phase};
pub use config::ParserConfig;
pub use context::{ExecutionContext, ResolvedColumn};
pub use engine::{MutationEngine, Mutator};
pub use error::{Error, InvariantViolation, LexingError, ParsingError, Result};
pub use lexer::{KeywordTable, Position, Token, TokenKind, TokenStream, Tokenizer};
pub use parser::{parse_sql, parse_sql_expecting, Parser};
