use super::{describe, error, is_expression_at, kind_at, leaf_kind, leaf_token};
use crate::ast::{Ast, InOperation, Node, NodeId, NodeKind, Operation};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::{Token, TokenKind};

/// Folds `expr [NOT] IN (list)` into an [`InOperation`].
pub struct InOperationMutator;

impl Mutator for InOperationMutator {
    fn name(&self) -> &'static str {
        "in_operation"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        if !ast.kind(node).is_expression() {
            return Ok(());
        }
        let negated = leaf_kind(ast, parent, offset + 1) == Some(TokenKind::Not);
        let keyword_at = offset + 1 + usize::from(negated);
        if leaf_kind(ast, parent, keyword_at) != Some(TokenKind::In)
            || kind_at(ast, parent, keyword_at + 1) != Some(NodeKind::Parenthesis)
        {
            return Ok(());
        }
        let (Some(keyword), Some(list)) = (
            leaf_token(ast, parent, keyword_at),
            ast.get(parent, keyword_at + 1),
        ) else {
            return Ok(());
        };
        let not = if negated {
            leaf_token(ast, parent, offset + 1)
        } else {
            None
        };

        let operation = ast.insert(Node::InOperation(InOperation {
            left: node,
            not,
            keyword,
            list,
        }));
        ast.replace(parent, offset, keyword_at + 2 - offset, operation)?;
        Ok(())
    }
}

/// Folds `left op right` into an [`Operation`], left to right and without
/// operator precedence.
///
/// Operators are the operator tokens plus `LIKE`, `IN`, `IS`, `IS NOT`,
/// `NOT LIKE` and `NOT IN`.
pub struct OperationMutator;

impl Mutator for OperationMutator {
    fn name(&self) -> &'static str {
        "operation"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        if let Some(kind) = ast.token_kind(node) {
            let starts_operator = matches!(
                kind,
                TokenKind::Operator | TokenKind::Like | TokenKind::Is | TokenKind::In
            );
            let has_left = offset
                .checked_sub(1)
                .is_some_and(|prev| is_expression_at(ast, parent, prev));
            if starts_operator && !has_left {
                return Err(error(
                    ast,
                    node,
                    format!("missing left operand for {}", describe(ast, node)),
                ));
            }
            return Ok(());
        }
        if !ast.kind(node).is_expression() {
            return Ok(());
        }

        let Some(operator) = operator_at(ast, parent, offset + 1) else {
            return Ok(());
        };
        let right_at = offset + 1 + operator.len();
        if !is_expression_at(ast, parent, right_at) {
            let last = ast.get(parent, right_at - 1).unwrap_or(node);
            return Err(match ast.get(parent, right_at) {
                Some(found) => error(
                    ast,
                    found,
                    format!(
                        "expected expression after {}, found {}",
                        describe(ast, last),
                        describe(ast, found)
                    ),
                ),
                None => error(ast, last, format!("expected expression after {}", describe(ast, last))),
            });
        }
        let Some(right) = ast.get(parent, right_at) else {
            return Ok(());
        };

        let operation = ast.insert(Node::Operation(Operation {
            left: node,
            operator,
            right,
        }));
        ast.replace(parent, offset, right_at + 1 - offset, operation)?;
        Ok(())
    }
}

/// Reads a one or two token operator starting at `offset`.
fn operator_at(ast: &Ast, branch: NodeId, offset: usize) -> Option<Vec<Token>> {
    let first = leaf_token(ast, branch, offset)?;
    let second = || leaf_token(ast, branch, offset + 1);
    match first.kind {
        TokenKind::Operator | TokenKind::Like | TokenKind::In => Some(vec![first]),
        TokenKind::Is => match second().filter(|t| t.is(TokenKind::Not)) {
            Some(not) => Some(vec![first, not]),
            None => Some(vec![first]),
        },
        TokenKind::Not => second()
            .filter(|t| t.is(TokenKind::Like) || t.is(TokenKind::In))
            .map(|next| vec![first, next]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Node;
    use crate::parse_sql;

    #[test]
    fn test_is_not_null() {
        let ast = parse_sql("a IS NOT NULL").unwrap();
        let Node::Operation(op) = ast.node(ast.statements()[0]) else {
            panic!("expected an operation");
        };
        assert_eq!(op.operator(), "IS NOT");
        assert_eq!(ast.dump_statements(), "Operation\n-Column\n-Literal");
    }

    #[test]
    fn test_not_like() {
        let ast = parse_sql("name NOT LIKE 'a%'").unwrap();
        let Node::Operation(op) = ast.node(ast.statements()[0]) else {
            panic!("expected an operation");
        };
        assert_eq!(op.operator(), "NOT LIKE");
    }

    #[test]
    fn test_not_in_list() {
        let ast = parse_sql("a NOT IN (1, 2)").unwrap();
        let Node::InOperation(op) = ast.node(ast.statements()[0]) else {
            panic!("expected an in operation");
        };
        assert!(op.is_negated());
        assert_eq!(
            ast.dump_statements(),
            "InOperation\n-Column\n-Parenthesis\n--Literal\n--TokenLeaf\n--Literal"
        );
    }

    #[test]
    fn test_in_operation_inside_comparison() {
        let ast = parse_sql("a IN (1) = b").unwrap();
        assert_eq!(ast.dump_statements(), "Operation\n-InOperation\n--Column\n--Parenthesis\n---Literal\n-Column");
    }

    #[test]
    fn test_right_side_not_an_expression() {
        let err = parse_sql("a = FROM").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("expected expression after '=', found 'FROM'"));
    }
}
