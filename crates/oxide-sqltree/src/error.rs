//! Error types for tokenizing, parsing and tree manipulation.

use thiserror::Error;

use crate::ast::{NodeKind, Phase};
use crate::diagnostics::ascii_location_dump;

/// No tokenizer rule matches at a position of the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character at line {line}, offset {offset}")]
pub struct LexingError {
    /// The SQL that failed to tokenize.
    pub sql: String,
    /// Zero-based line of the unmatched character.
    pub line: usize,
    /// Zero-based offset of the unmatched character within its line.
    pub offset: usize,
}

impl LexingError {
    /// Creates a lexing error.
    #[must_use]
    pub fn new(sql: impl Into<String>, line: usize, offset: usize) -> Self {
        Self {
            sql: sql.into(),
            line,
            offset,
        }
    }

    /// Renders the failing location inside the SQL.
    #[must_use]
    pub fn ascii_location_dump(&self) -> String {
        ascii_location_dump(&self.sql, self.line, self.offset)
    }
}

/// The input is structurally invalid at a node of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, offset {offset}")]
pub struct ParsingError {
    /// What went wrong.
    pub message: String,
    /// The SQL being parsed.
    pub sql: String,
    /// Zero-based line of the offending node.
    pub line: usize,
    /// Zero-based offset of the offending node within its line.
    pub offset: usize,
}

impl ParsingError {
    /// Creates a parsing error.
    #[must_use]
    pub fn new(message: impl Into<String>, sql: impl Into<String>, line: usize, offset: usize) -> Self {
        Self {
            message: message.into(),
            sql: sql.into(),
            line,
            offset,
        }
    }

    /// Renders the failing location inside the SQL.
    #[must_use]
    pub fn ascii_location_dump(&self) -> String {
        ascii_location_dump(&self.sql, self.line, self.offset)
    }
}

/// An internal precondition was broken by a rule or a caller.
///
/// These point at a bug rather than at invalid SQL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A tree operation was called in the wrong lifecycle phase.
    #[error("{operation} is not allowed in the {actual:?} phase")]
    WrongPhase {
        /// The attempted operation.
        operation: &'static str,
        /// The phase the tree was in.
        actual: Phase,
    },

    /// A splice range does not fit the branch.
    #[error("cannot replace {length} children at offset {offset} of a branch with {len} children")]
    OutOfRange {
        /// Requested start offset.
        offset: usize,
        /// Requested number of children to remove.
        length: usize,
        /// Actual number of children.
        len: usize,
    },

    /// A branch operation targeted a node without children of its own.
    #[error("{0} is not a branch")]
    NotABranch(NodeKind),

    /// A conjunction needs at least two parts.
    #[error("a conjunction needs at least 2 parts, got {0}")]
    TooFewConjunctionParts(usize),

    /// Two nodes cannot be merged.
    #[error("cannot merge {left} with {right}")]
    NotMergeable {
        /// Kind of the node being replaced.
        left: NodeKind,
        /// Kind of the node merged into it.
        right: NodeKind,
    },

    /// A node is not linked into the tree where it was expected.
    #[error("{0} is detached from the tree")]
    Detached(NodeKind),

    /// A rule kept changing the tree without reaching a fixpoint.
    #[error("mutator {mutator} did not reach a fixpoint within {passes} passes")]
    PassLimitExceeded {
        /// The rule that kept firing.
        mutator: &'static str,
        /// The configured ceiling.
        passes: usize,
    },
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Tokenizing failed.
    #[error(transparent)]
    Lexing(#[from] LexingError),

    /// The token stream does not form valid SQL.
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    /// A rule or caller broke an internal precondition.
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl Error {
    /// Renders the error location for lexing and parsing errors.
    #[must_use]
    pub fn location_dump(&self) -> Option<String> {
        match self {
            Self::Lexing(e) => Some(e.ascii_location_dump()),
            Self::Parsing(e) => Some(e.ascii_location_dump()),
            Self::Invariant(_) => None,
        }
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
