use super::{describe, error, leaf_kind, leaf_token, unexpected};
use crate::ast::{Ast, Node, NodeId, OrderBy, OrderItem};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds `ORDER BY expr [ASC|DESC], ...` into an [`OrderBy`].
///
/// An item must be followed by a direction, a comma, `;` or the end of the
/// branch.
pub struct OrderByMutator;

impl Mutator for OrderByMutator {
    fn name(&self) -> &'static str {
        "order_by"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        let Some(order) = ast.token(node).filter(|t| t.is(TokenKind::Order)).cloned() else {
            return Ok(());
        };
        let Some(by) = leaf_token(ast, parent, offset + 1).filter(|t| t.is(TokenKind::By)) else {
            return Err(error(ast, node, "expected BY after ORDER"));
        };

        let mut items = Vec::new();
        let mut at = offset + 2;
        loop {
            let expression = match ast.get(parent, at) {
                Some(id) if ast.kind(id).is_expression() => id,
                Some(id) => return Err(unexpected(ast, id, "expression")),
                None => {
                    let last = ast.get(parent, at - 1).unwrap_or(node);
                    return Err(error(ast, last, format!("expected expression after {}", describe(ast, last))));
                }
            };
            at += 1;

            let direction = match leaf_kind(ast, parent, at) {
                Some(TokenKind::Asc | TokenKind::Desc) => {
                    at += 1;
                    leaf_token(ast, parent, at - 1)
                }
                _ => None,
            };
            items.push(OrderItem {
                expression,
                direction,
            });

            match (ast.get(parent, at), leaf_kind(ast, parent, at)) {
                (None, _) | (_, Some(TokenKind::Semicolon)) => break,
                (_, Some(TokenKind::Comma)) => at += 1,
                (Some(found), _) => {
                    return Err(error(
                        ast,
                        found,
                        format!("expected ASC or DESC, found {}", describe(ast, found)),
                    ));
                }
            }
        }

        let order_by = ast.insert(Node::OrderBy(OrderBy { order, by, items }));
        ast.replace(parent, offset, at - offset, order_by)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Node, OrderDirection};
    use crate::parse_sql;

    #[test]
    fn test_directions_are_optional() {
        let ast = parse_sql("ORDER BY a DESC, b, c ASC").unwrap();
        let Node::OrderBy(order_by) = ast.node(ast.statements()[0]) else {
            panic!("expected an order by");
        };
        let directions: Vec<_> = order_by.items.iter().map(|i| i.direction()).collect();
        assert_eq!(
            directions,
            vec![Some(OrderDirection::Desc), None, Some(OrderDirection::Asc)]
        );
    }

    #[test]
    fn test_unknown_direction() {
        let err = parse_sql("SELECT a FROM t ORDER BY a UP").unwrap_err();
        assert!(err.to_string().starts_with("expected ASC or DESC, found Column"));
    }

    #[test]
    fn test_stops_at_semicolon() {
        let ast = parse_sql("ORDER BY a; ORDER BY b").unwrap();
        assert_eq!(ast.statements().len(), 2);
    }
}
