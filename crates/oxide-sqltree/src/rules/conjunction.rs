use super::{describe, error, is_expression_at, leaf_kind, leaf_token};
use crate::ast::{Ast, Conjunction, ConjunctionPart, Node, NodeId};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds `expr (AND|OR expr)+` into one [`Conjunction`].
///
/// `AND` and `OR` share one level: the parts are kept flat, in source
/// order, and no operator binds tighter than the other.
pub struct ConjunctionMutator;

fn is_junction(kind: Option<TokenKind>) -> bool {
    matches!(kind, Some(TokenKind::And | TokenKind::Or))
}

impl Mutator for ConjunctionMutator {
    fn name(&self) -> &'static str {
        "conjunction"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        if is_junction(ast.token_kind(node)) {
            let has_left = offset
                .checked_sub(1)
                .is_some_and(|prev| is_expression_at(ast, parent, prev));
            if !has_left {
                return Err(error(
                    ast,
                    node,
                    format!("missing left operand for {}", describe(ast, node)),
                ));
            }
            return Ok(());
        }
        if !ast.kind(node).is_expression() || !is_junction(leaf_kind(ast, parent, offset + 1)) {
            return Ok(());
        }

        let mut parts = vec![ConjunctionPart {
            operator: None,
            expression: node,
        }];
        let mut at = offset + 1;
        while is_junction(leaf_kind(ast, parent, at)) {
            let (Some(operator), Some(operator_id)) = (leaf_token(ast, parent, at), ast.get(parent, at)) else {
                break;
            };
            let expression = ast.get(parent, at + 1).filter(|id| ast.kind(*id).is_expression());
            let Some(expression) = expression else {
                return Err(error(
                    ast,
                    operator_id,
                    format!("expected expression after {}", describe(ast, operator_id)),
                ));
            };
            parts.push(ConjunctionPart {
                operator: Some(operator),
                expression,
            });
            at += 2;
        }

        let conjunction = ast.insert(Node::Conjunction(Conjunction::new(parts)?));
        ast.replace(parent, offset, at - offset, conjunction)?;
        Ok(())
    }
}
