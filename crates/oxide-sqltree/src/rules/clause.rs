use super::{describe, error, expression_list, is_expression_at, leaf_token, unexpected};
use crate::ast::{Ast, Condition, GroupBy, Node, NodeId};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds `WHERE expr`.
pub struct WhereMutator;

/// Folds `HAVING expr`.
pub struct HavingMutator;

/// Folds `GROUP BY expr, ...`.
pub struct GroupByMutator;

impl Mutator for WhereMutator {
    fn name(&self) -> &'static str {
        "where"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        fold_condition(ast, node, offset, parent, TokenKind::Where)
    }
}

impl Mutator for HavingMutator {
    fn name(&self) -> &'static str {
        "having"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        fold_condition(ast, node, offset, parent, TokenKind::Having)
    }
}

fn fold_condition(ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId, keyword_kind: TokenKind) -> Result<()> {
    let Some(keyword) = ast.token(node).filter(|t| t.is(keyword_kind)).cloned() else {
        return Ok(());
    };
    if !is_expression_at(ast, parent, offset + 1) {
        return Err(match ast.get(parent, offset + 1) {
            Some(found) => unexpected(ast, found, &format!("expression after {}", keyword_kind.name())),
            None => error(ast, node, format!("expected expression after {}", describe(ast, node))),
        });
    }
    let Some(expression) = ast.get(parent, offset + 1) else {
        return Ok(());
    };

    let condition = Condition {
        keyword,
        expression,
    };
    let clause = ast.insert(if keyword_kind == TokenKind::Where {
        Node::Where(condition)
    } else {
        Node::Having(condition)
    });
    ast.replace(parent, offset, 2, clause)?;
    Ok(())
}

impl Mutator for GroupByMutator {
    fn name(&self) -> &'static str {
        "group_by"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        let Some(group) = ast.token(node).filter(|t| t.is(TokenKind::Group)).cloned() else {
            return Ok(());
        };
        let Some(by) = leaf_token(ast, parent, offset + 1).filter(|t| t.is(TokenKind::By)) else {
            return Err(error(ast, node, "expected BY after GROUP"));
        };
        let (expressions, end) = expression_list(ast, parent, offset + 2, "expression")?;

        let group_by = ast.insert(Node::GroupBy(GroupBy {
            group,
            by,
            expressions,
        }));
        ast.replace(parent, offset, end - offset, group_by)?;
        Ok(())
    }
}
