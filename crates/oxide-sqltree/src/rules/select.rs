use super::{alias_at, at_statement_end, describe, error, is_leaf, kind_at, leaf_token};
use crate::ast::{Ast, Node, NodeId, NodeKind, Select, SelectItem};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds a complete `SELECT` statement.
///
/// `SELECT [DISTINCT] item [AS alias], ... [From] [Join]* [Where] [GroupBy]
/// [Having] [OrderBy]`, and only when nothing but `;` or the end of the
/// branch follows. Anything else leaves the tokens in place.
pub struct SelectMutator;

impl Mutator for SelectMutator {
    fn name(&self) -> &'static str {
        "select"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        let Some(keyword) = ast.token(node).filter(|t| t.is(TokenKind::Select)).cloned() else {
            return Ok(());
        };
        let mut at = offset + 1;
        let distinct = leaf_token(ast, parent, at).filter(|t| t.is(TokenKind::Distinct));
        if distinct.is_some() {
            at += 1;
        }

        let mut columns = Vec::new();
        loop {
            let expression = match ast.get(parent, at) {
                Some(id) if ast.kind(id).is_expression() => id,
                _ if columns.is_empty() => {
                    let anchor = ast.get(parent, at - 1).unwrap_or(node);
                    return Err(error(
                        ast,
                        anchor,
                        format!("expected at least one column after {}", describe(ast, anchor)),
                    ));
                }
                _ => {
                    let comma = ast.get(parent, at - 1).unwrap_or(node);
                    return Err(error(ast, comma, "expected column after ','"));
                }
            };
            let alias = alias_at(ast, parent, at + 1, false)?;
            at += 1 + alias.as_ref().map_or(0, |a| a.width);
            columns.push(SelectItem {
                expression,
                alias: alias.map(|a| a.token),
            });

            if !is_leaf(ast, parent, at, TokenKind::Comma) {
                break;
            }
            at += 1;
        }

        let mut take = |kind: NodeKind| {
            let found = ast.get(parent, at).filter(|_| kind_at(ast, parent, at) == Some(kind));
            if found.is_some() {
                at += 1;
            }
            found
        };
        let from = take(NodeKind::From);
        let mut joins = Vec::new();
        while let Some(join) = take(NodeKind::Join) {
            joins.push(join);
        }
        let where_clause = take(NodeKind::Where);
        let group_by = take(NodeKind::GroupBy);
        let having = take(NodeKind::Having);
        let order_by = take(NodeKind::OrderBy);

        if !at_statement_end(ast, parent, at) {
            return Ok(());
        }

        let select = ast.insert(Node::Select(Select {
            keyword,
            distinct,
            columns,
            from,
            joins,
            where_clause,
            group_by,
            having,
            order_by,
        }));
        ast.replace(parent, offset, at - offset, select)?;
        Ok(())
    }
}
