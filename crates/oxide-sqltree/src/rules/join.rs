use super::{alias_at, describe, error, kind_at, leaf_kind, leaf_token, source_at};
use crate::ast::{Ast, Join, JoinCondition, Node, NodeId, NodeKind};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds `[modifiers] JOIN source [[AS] alias] [ON expr | USING (cols)]`
/// into a [`Join`].
///
/// The rule anchors on the first modifier word, or on `JOIN` itself when
/// there is none. Modifier words not followed by `JOIN` are left alone.
pub struct JoinMutator;

impl Mutator for JoinMutator {
    fn name(&self) -> &'static str {
        "join"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        let Some(kind) = ast.token_kind(node) else {
            return Ok(());
        };
        let after_modifier = offset
            .checked_sub(1)
            .and_then(|prev| leaf_kind(ast, parent, prev))
            .is_some_and(TokenKind::is_join_modifier);
        if !(kind == TokenKind::Join || kind.is_join_modifier()) || after_modifier {
            return Ok(());
        }

        let mut keywords = Vec::new();
        let mut at = offset;
        while let Some(token) = leaf_token(ast, parent, at).filter(|t| t.kind.is_join_modifier()) {
            keywords.push(token);
            at += 1;
        }
        let Some(join) = leaf_token(ast, parent, at).filter(|t| t.is(TokenKind::Join)) else {
            return Ok(());
        };
        let join_id = ast.get(parent, at).unwrap_or(node);
        keywords.push(join);
        at += 1;

        let Some(source) = source_at(ast, parent, at, true)? else {
            let message = match ast.get(parent, at) {
                Some(found) => format!("expected table after JOIN, found {}", describe(ast, found)),
                None => "expected table after JOIN".to_owned(),
            };
            return Err(error(ast, join_id, message));
        };
        at += 1;

        let alias = alias_at(ast, parent, at, true)?;
        at += alias.as_ref().map_or(0, |a| a.width);

        let condition = match leaf_kind(ast, parent, at) {
            Some(keyword_kind @ (TokenKind::On | TokenKind::Using)) => {
                let keyword_id = ast.get(parent, at).unwrap_or(node);
                let valid = match keyword_kind {
                    TokenKind::On => kind_at(ast, parent, at + 1).is_some_and(NodeKind::is_expression),
                    _ => kind_at(ast, parent, at + 1) == Some(NodeKind::Parenthesis),
                };
                let (true, Some(keyword), Some(expression)) =
                    (valid, leaf_token(ast, parent, at), ast.get(parent, at + 1))
                else {
                    let what = if keyword_kind == TokenKind::On {
                        "expression"
                    } else {
                        "column list"
                    };
                    return Err(error(
                        ast,
                        keyword_id,
                        format!("expected {what} after {}", describe(ast, keyword_id)),
                    ));
                };
                at += 2;
                Some(JoinCondition {
                    keyword,
                    expression,
                })
            }
            _ => None,
        };

        let source = source.into_node(ast);
        let join = ast.insert(Node::Join(Join {
            keywords,
            source,
            alias: alias.map(|a| a.token),
            condition,
        }));
        ast.replace(parent, offset, at - offset, join)?;
        Ok(())
    }
}
