use super::{error, is_leaf, leaf_token};
use crate::ast::{Ast, Column, Node, NodeId};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds `name`, `table.name` and `schema.table.name` into a [`Column`].
///
/// Parts are assigned right to left: the last one is always the column.
pub struct ColumnMutator;

impl Mutator for ColumnMutator {
    fn name(&self) -> &'static str {
        "column"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        if ast.token_kind(node) != Some(TokenKind::Symbol)
            || offset
                .checked_sub(1)
                .is_some_and(|prev| is_leaf(ast, parent, prev, TokenKind::Dot))
        {
            return Ok(());
        }

        let mut parts = Vec::with_capacity(3);
        let mut end = offset;
        while let Some(part) = leaf_token(ast, parent, end) {
            parts.push(part);
            let Some(dot) = ast.get(parent, end + 1).filter(|_| is_leaf(ast, parent, end + 1, TokenKind::Dot)) else {
                break;
            };
            if parts.len() == 3 {
                return Err(error(ast, dot, "too many qualifiers for a column name"));
            }
            if !is_leaf(ast, parent, end + 2, TokenKind::Symbol) {
                return Err(error(ast, dot, "expected name after '.'"));
            }
            end += 2;
        }

        let Some(column) = parts.pop() else {
            return Ok(());
        };
        let table = parts.pop();
        let schema = parts.pop();
        let id = ast.insert(Node::Column(Column {
            schema,
            table,
            column,
        }));
        ast.replace(parent, offset, end - offset + 1, id)?;
        Ok(())
    }
}
