use super::{ends_operand, is_leaf, leaf_token};
use crate::ast::{Ast, Literal, Node, NodeId};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Wraps strings, numbers, `NULL` and prepared arguments in a [`Literal`].
///
/// A `-` or `+` directly before a number is folded into it when nothing
/// that could be a left operand precedes the sign.
pub struct LiteralMutator;

impl Mutator for LiteralMutator {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        let Some(token) = ast.token(node).cloned() else {
            return Ok(());
        };
        let (literal, width) = match token.kind {
            TokenKind::StringLiteral
            | TokenKind::NumericLiteral
            | TokenKind::Null
            | TokenKind::PreparedArgument => (
                Literal {
                    sign: None,
                    value: token,
                },
                1,
            ),
            TokenKind::Operator
                if (token.lexeme == "-" || token.lexeme == "+")
                    && is_leaf(ast, parent, offset + 1, TokenKind::NumericLiteral)
                    && !offset
                        .checked_sub(1)
                        .and_then(|prev| ast.get(parent, prev))
                        .is_some_and(|prev| ends_operand(ast, prev)) =>
            {
                let Some(value) = leaf_token(ast, parent, offset + 1) else {
                    return Ok(());
                };
                (
                    Literal {
                        sign: Some(token),
                        value,
                    },
                    2,
                )
            }
            _ => return Ok(()),
        };

        let literal = ast.insert(Node::Literal(literal));
        ast.replace(parent, offset, width, literal)?;
        Ok(())
    }
}
