use super::{alias_at, at_statement_end, describe, error, is_leaf, kind_at, leaf_token, source_at};
use crate::ast::{Ast, Node, NodeId, NodeKind, Update};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds a complete `UPDATE` statement.
///
/// `UPDATE table [[AS] alias] [Join]* SET col = expr, ... [Where]
/// [OrderBy]`, finalized only at `;` or the end of the branch. Every
/// assignment must be an `=` operation with a column on its left.
pub struct UpdateMutator;

impl Mutator for UpdateMutator {
    fn name(&self) -> &'static str {
        "update"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        let Some(keyword) = ast.token(node).filter(|t| t.is(TokenKind::Update)).cloned() else {
            return Ok(());
        };
        let mut at = offset + 1;
        let Some(table) = source_at(ast, parent, at, false)? else {
            return Err(error(ast, node, "expected table after UPDATE"));
        };
        at += 1;
        let alias = alias_at(ast, parent, at, true)?;
        at += alias.as_ref().map_or(0, |a| a.width);

        let mut joins = Vec::new();
        while let Some(join) = ast.get(parent, at).filter(|&id| ast.kind(id) == NodeKind::Join) {
            joins.push(join);
            at += 1;
        }

        let Some(set) = leaf_token(ast, parent, at).filter(|t| t.is(TokenKind::Set)) else {
            return Ok(());
        };
        let set_id = ast.get(parent, at).unwrap_or(node);
        at += 1;

        let mut assignments = Vec::new();
        loop {
            let Some(assignment) = ast.get(parent, at).filter(|&id| ast.kind(id).is_expression()) else {
                break;
            };
            let valid = match ast.node(assignment) {
                Node::Operation(op) => op.is_equality() && ast.kind(op.left) == NodeKind::Column,
                _ => false,
            };
            if !valid {
                return Err(error(
                    ast,
                    assignment,
                    "expected an assignment of the form column = value",
                ));
            }
            assignments.push(assignment);
            at += 1;
            if !is_leaf(ast, parent, at, TokenKind::Comma) {
                break;
            }
            at += 1;
        }
        if assignments.is_empty() {
            return Err(error(
                ast,
                set_id,
                format!("expected at least one assignment after {}", describe(ast, set_id)),
            ));
        }
        if is_leaf(ast, parent, at - 1, TokenKind::Comma) {
            let comma = ast.get(parent, at - 1).unwrap_or(set_id);
            return Err(error(ast, comma, "expected assignment after ','"));
        }

        let mut take = |kind: NodeKind| {
            let found = ast.get(parent, at).filter(|_| kind_at(ast, parent, at) == Some(kind));
            if found.is_some() {
                at += 1;
            }
            found
        };
        let where_clause = take(NodeKind::Where);
        let order_by = take(NodeKind::OrderBy);

        if !at_statement_end(ast, parent, at) {
            return Ok(());
        }

        let table = table.into_node(ast);
        let update = ast.insert(Node::Update(Update {
            keyword,
            table,
            alias: alias.map(|a| a.token),
            joins,
            set,
            assignments,
            where_clause,
            order_by,
        }));
        ast.replace(parent, offset, at - offset, update)?;
        Ok(())
    }
}
