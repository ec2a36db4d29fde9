use super::{describe, error, leaf_kind, leaf_token, unexpected};
use crate::ast::{Ast, Node, NodeId, NodeKind, Parenthesis};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Groups a balanced `( ... )` span into a [`Parenthesis`] branch.
///
/// The engine resolves the bracketed nodes as soon as the branch is built.
/// When the rule meets the branch again its content must be a comma
/// separated list of expressions, or of function arguments when a function
/// name precedes it.
pub struct ParenthesisMutator;

impl Mutator for ParenthesisMutator {
    fn name(&self) -> &'static str {
        "parenthesis"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        match ast.token_kind(node) {
            Some(TokenKind::BracketOpen) => return group(ast, node, offset, parent),
            Some(TokenKind::BracketClose) => return Err(error(ast, node, "unbalanced closing bracket")),
            _ => {}
        }
        if ast.kind(node) == NodeKind::Parenthesis {
            let arguments = offset
                .checked_sub(1)
                .is_some_and(|prev| leaf_kind(ast, parent, prev) == Some(TokenKind::Symbol));
            validate(ast, node, arguments)?;
        }
        Ok(())
    }
}

fn group(ast: &mut Ast, open_id: NodeId, offset: usize, parent: NodeId) -> Result<()> {
    let mut depth = 0usize;
    let mut close = None;
    for at in offset..ast.len(parent) {
        match leaf_kind(ast, parent, at) {
            Some(TokenKind::BracketOpen) => depth += 1,
            Some(TokenKind::BracketClose) => {
                depth -= 1;
                if depth == 0 {
                    close = Some(at);
                    break;
                }
            }
            _ => {}
        }
    }

    let (Some(close), Some(open)) = (close, leaf_token(ast, parent, offset)) else {
        return Err(error(ast, open_id, "missing closing bracket"));
    };
    let Some(close_token) = leaf_token(ast, parent, close) else {
        return Err(error(ast, open_id, "missing closing bracket"));
    };
    let children = (offset + 1..close).filter_map(|at| ast.get(parent, at)).collect();
    let parenthesis = ast.insert(Node::Parenthesis(Parenthesis {
        open,
        close: close_token,
        children,
    }));
    ast.replace(parent, offset, close - offset + 1, parenthesis)?;
    Ok(())
}

/// Checks `item (, item)*` inside a resolved bracket.
///
/// Function arguments may be empty and may start with `DISTINCT`. A
/// subquery counts as an item.
fn validate(ast: &Ast, parenthesis: NodeId, arguments: bool) -> Result<()> {
    let children = ast.children(parenthesis);
    let mut items = children.as_slice();
    if arguments {
        if let [first, rest @ ..] = items {
            if ast.token_kind(*first) == Some(TokenKind::Distinct) {
                items = rest;
            }
        }
        if items.is_empty() && children.is_empty() {
            return Ok(());
        }
    }
    if items.is_empty() {
        return Err(error(ast, parenthesis, "expected expression inside brackets"));
    }

    let mut expect_item = true;
    for &id in items {
        if expect_item {
            let kind = ast.kind(id);
            if !kind.is_expression() && kind != NodeKind::Select {
                return Err(unexpected(ast, id, "expression"));
            }
        } else if ast.token_kind(id) != Some(TokenKind::Comma) {
            return Err(unexpected(ast, id, "',' or ')'"));
        }
        expect_item = !expect_item;
    }
    if expect_item {
        if let Some(&last) = items.last() {
            return Err(error(ast, last, format!("expected expression after {}", describe(ast, last))));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::ast::{Node, NodeKind};
    use crate::parse_sql;

    fn message(sql: &str) -> String {
        match parse_sql(sql).unwrap_err() {
            crate::Error::Parsing(e) => e.message,
            other => panic!("expected a parsing error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_brackets() {
        let ast = parse_sql("((a))").unwrap();
        assert_eq!(ast.dump_statements(), "Parenthesis\n-Parenthesis\n--Column");
    }

    #[test]
    fn test_list_inside_brackets() {
        let ast = parse_sql("(1, 'x', b)").unwrap();
        let paren = ast.statements()[0];
        let Node::Parenthesis(p) = ast.node(paren) else {
            panic!("expected brackets");
        };
        assert_eq!(p.children().len(), 5);
        assert_eq!(ast.kind(p.children()[4]), NodeKind::Column);
    }

    #[test]
    fn test_missing_closing_bracket() {
        assert_eq!(message("SELECT (a FROM t"), "missing closing bracket");
    }

    #[test]
    fn test_unbalanced_closing_bracket() {
        let err = parse_sql("SELECT a) FROM t").unwrap_err();
        assert_eq!(err.to_string(), "unbalanced closing bracket at line 0, offset 8");
    }

    #[test]
    fn test_trailing_comma_inside_brackets() {
        assert_eq!(message("(a, )"), "expected expression after ','");
    }

    #[test]
    fn test_missing_comma_inside_brackets() {
        assert_eq!(message("(a b)"), "expected ',' or ')', found Column");
    }

    #[test]
    fn test_empty_brackets_need_a_function() {
        assert_eq!(message("()"), "expected expression inside brackets");
        assert!(parse_sql("SELECT NOW() FROM t").is_ok());
    }
}
