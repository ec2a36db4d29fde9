//! The grammar rules folding token leaves into typed nodes.
//!
//! Every rule looks at one child of a branch and, if a pattern starts
//! there, replaces the matched siblings with a single node. Their order in
//! [`default_mutators`] matters: operands must exist before operators,
//! operators before conjunctions, conjunctions before clauses, and clauses
//! before statements.

mod all_columns;
mod clause;
mod column;
mod conjunction;
mod from;
mod function_call;
mod join;
mod literal;
mod operation;
mod order_by;
mod parenthesis;
mod select;
mod update;

pub use all_columns::AllColumnsSelectorMutator;
pub use clause::{GroupByMutator, HavingMutator, WhereMutator};
pub use column::ColumnMutator;
pub use conjunction::ConjunctionMutator;
pub use from::FromMutator;
pub use function_call::FunctionCallMutator;
pub use join::JoinMutator;
pub use literal::LiteralMutator;
pub use operation::{InOperationMutator, OperationMutator};
pub use order_by::OrderByMutator;
pub use parenthesis::ParenthesisMutator;
pub use select::SelectMutator;
pub use update::UpdateMutator;

use crate::ast::{Ast, Column, Node, NodeId, NodeKind, Table};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::{Token, TokenKind};

/// Returns the built-in rules in the order they must run.
#[must_use]
pub fn default_mutators() -> Vec<Box<dyn Mutator>> {
    vec![
        Box::new(ParenthesisMutator),
        Box::new(FunctionCallMutator),
        Box::new(LiteralMutator),
        Box::new(AllColumnsSelectorMutator),
        Box::new(ColumnMutator),
        Box::new(InOperationMutator),
        Box::new(OperationMutator),
        Box::new(ConjunctionMutator),
        Box::new(FromMutator),
        Box::new(JoinMutator),
        Box::new(WhereMutator),
        Box::new(HavingMutator),
        Box::new(GroupByMutator),
        Box::new(OrderByMutator),
        Box::new(SelectMutator),
        Box::new(UpdateMutator),
    ]
}

/// Token kind of the leaf at `offset`, if that child is a leaf.
fn leaf_kind(ast: &Ast, branch: NodeId, offset: usize) -> Option<TokenKind> {
    ast.get(branch, offset).and_then(|id| ast.token_kind(id))
}

fn is_leaf(ast: &Ast, branch: NodeId, offset: usize, kind: TokenKind) -> bool {
    leaf_kind(ast, branch, offset) == Some(kind)
}

/// Clones the token of the leaf at `offset`.
fn leaf_token(ast: &Ast, branch: NodeId, offset: usize) -> Option<Token> {
    ast.get(branch, offset).and_then(|id| ast.token(id)).cloned()
}

fn is_expression_at(ast: &Ast, branch: NodeId, offset: usize) -> bool {
    ast.get(branch, offset)
        .is_some_and(|id| ast.kind(id).is_expression())
}

/// Returns true when nothing but an optional `;` follows.
fn at_statement_end(ast: &Ast, branch: NodeId, offset: usize) -> bool {
    !ast.has(branch, offset) || is_leaf(ast, branch, offset, TokenKind::Semicolon)
}

/// Returns true if a node can be the left operand of a binary operator.
fn ends_operand(ast: &Ast, id: NodeId) -> bool {
    match ast.token_kind(id) {
        Some(kind) => matches!(
            kind,
            TokenKind::Symbol
                | TokenKind::StringLiteral
                | TokenKind::NumericLiteral
                | TokenKind::Null
                | TokenKind::PreparedArgument
                | TokenKind::BracketClose
        ),
        None => ast.kind(id).is_expression(),
    }
}

/// Short description of a node for error messages.
fn describe(ast: &Ast, id: NodeId) -> String {
    ast.token(id)
        .map_or_else(|| ast.kind(id).to_string(), |token| format!("'{}'", token.lexeme))
}

fn error(ast: &Ast, id: NodeId, message: impl Into<String>) -> crate::error::Error {
    ast.error_at(id, message).into()
}

fn unexpected(ast: &Ast, id: NodeId, expected: &str) -> crate::error::Error {
    error(ast, id, format!("expected {expected}, found {}", describe(ast, id)))
}

/// Returns the column at `offset` when it is a bare, unqualified name.
fn plain_name(ast: &Ast, branch: NodeId, offset: usize) -> Option<Token> {
    match ast.get(branch, offset).map(|id| ast.node(id)) {
        Some(Node::Column(Column {
            schema: None,
            table: None,
            column,
        })) => Some(column.clone()),
        _ => None,
    }
}

/// An alias found after a table or a select item.
struct Alias {
    token: Token,
    /// Number of siblings it spans: 2 with `AS`, 1 without.
    width: usize,
}

/// Reads `AS name`, or a bare `name` when `bare` is allowed.
fn alias_at(ast: &Ast, branch: NodeId, offset: usize, bare: bool) -> Result<Option<Alias>> {
    if let Some(as_id) = ast.get(branch, offset).filter(|&id| ast.token_kind(id) == Some(TokenKind::As)) {
        return match plain_name(ast, branch, offset + 1) {
            Some(token) => Ok(Some(Alias { token, width: 2 })),
            None => Err(error(ast, as_id, "expected alias after AS")),
        };
    }
    if bare {
        return Ok(plain_name(ast, branch, offset).map(|token| Alias { token, width: 1 }));
    }
    Ok(None)
}

/// The source of a FROM, JOIN or UPDATE.
enum Source {
    Table(Table),
    Subquery(NodeId),
}

impl Source {
    fn into_node(self, ast: &mut Ast) -> NodeId {
        match self {
            Self::Table(table) => ast.insert(Node::Table(table)),
            Self::Subquery(id) => id,
        }
    }
}

/// Reads a `[schema.]table` reference, or a bracketed subquery when
/// `subquery` is allowed.
fn source_at(ast: &Ast, branch: NodeId, offset: usize, subquery: bool) -> Result<Option<Source>> {
    let Some(id) = ast.get(branch, offset) else {
        return Ok(None);
    };
    match ast.node(id) {
        Node::Column(column) if column.schema.is_some() => {
            Err(error(ast, id, "too many qualifiers for a table name"))
        }
        Node::Column(column) => Ok(Some(Source::Table(Table {
            schema: column.table.clone(),
            name: column.column.clone(),
        }))),
        Node::Parenthesis(_) if subquery => Ok(Some(Source::Subquery(id))),
        _ => Ok(None),
    }
}

/// Reads `expr (, expr)*` from `offset`, stopping before the first sibling
/// that is neither. Returns the expressions and the offset after them.
fn expression_list(
    ast: &Ast,
    branch: NodeId,
    offset: usize,
    what: &str,
) -> Result<(Vec<NodeId>, usize)> {
    let mut items = Vec::new();
    let mut at = offset;
    loop {
        match ast.get(branch, at) {
            Some(id) if ast.kind(id).is_expression() => items.push(id),
            Some(id) => return Err(unexpected(ast, id, what)),
            None => {
                let anchor = at.checked_sub(1).and_then(|prev| ast.get(branch, prev));
                return Err(match anchor {
                    Some(prev) => error(ast, prev, format!("expected {what} after {}", describe(ast, prev))),
                    None => error(ast, branch, format!("expected {what}")),
                });
            }
        }
        at += 1;
        if !is_leaf(ast, branch, at, TokenKind::Comma) {
            return Ok((items, at));
        }
        at += 1;
    }
}

/// Returns the kind of the node at `offset`, if any.
fn kind_at(ast: &Ast, branch: NodeId, offset: usize) -> Option<NodeKind> {
    ast.get(branch, offset).map(|id| ast.kind(id))
}
