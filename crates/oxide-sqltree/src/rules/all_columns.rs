use super::{error, is_leaf, leaf_kind, leaf_token};
use crate::ast::{AllColumnsSelector, Ast, Node, NodeId};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds `*`, `table.*` and `schema.table.*` into an
/// [`AllColumnsSelector`].
pub struct AllColumnsSelectorMutator;

impl Mutator for AllColumnsSelectorMutator {
    fn name(&self) -> &'static str {
        "all_columns_selector"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        let Some(star) = ast.token(node).filter(|t| t.is(TokenKind::Star)).cloned() else {
            return Ok(());
        };

        let mut qualifiers = Vec::new();
        let mut start = offset;
        while start > 0 && is_leaf(ast, parent, start - 1, TokenKind::Dot) {
            let dot = ast.get(parent, start - 1);
            let name = (start >= 2 && leaf_kind(ast, parent, start - 2) == Some(TokenKind::Symbol))
                .then(|| leaf_token(ast, parent, start - 2))
                .flatten();
            match (name, dot) {
                (Some(name), _) if qualifiers.len() < 2 => {
                    qualifiers.push(name);
                    start -= 2;
                }
                (Some(_), Some(dot)) => {
                    return Err(error(ast, dot, "too many qualifiers before '*'"));
                }
                (None, Some(dot)) => {
                    return Err(error(ast, dot, "expected table name before '.'"));
                }
                (_, None) => return Ok(()),
            }
        }

        let mut qualifiers = qualifiers.into_iter();
        let table = qualifiers.next();
        let schema = qualifiers.next();
        let selector = ast.insert(Node::AllColumnsSelector(AllColumnsSelector {
            schema,
            table,
            star,
        }));
        ast.replace(parent, start, offset - start + 1, selector)?;
        Ok(())
    }
}
