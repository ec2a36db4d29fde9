use super::{is_leaf, kind_at, leaf_token};
use crate::ast::{Ast, FunctionCall, Node, NodeId, NodeKind};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds `name(args)` into a [`FunctionCall`].
pub struct FunctionCallMutator;

impl Mutator for FunctionCallMutator {
    fn name(&self) -> &'static str {
        "function_call"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        if ast.token_kind(node) != Some(TokenKind::Symbol)
            || kind_at(ast, parent, offset + 1) != Some(NodeKind::Parenthesis)
            || offset
                .checked_sub(1)
                .is_some_and(|prev| is_leaf(ast, parent, prev, TokenKind::Dot))
        {
            return Ok(());
        }
        let (Some(name), Some(arguments)) = (leaf_token(ast, parent, offset), ast.get(parent, offset + 1)) else {
            return Ok(());
        };
        let distinct = ast
            .children(arguments)
            .first()
            .is_some_and(|&first| ast.token_kind(first) == Some(TokenKind::Distinct));

        let call = ast.insert(Node::FunctionCall(FunctionCall {
            name,
            distinct,
            arguments,
        }));
        ast.replace(parent, offset, 2, call)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Node;
    use crate::parse_sql;

    #[test]
    fn test_count_distinct() {
        let ast = parse_sql("COUNT(DISTINCT a)").unwrap();
        let Node::FunctionCall(call) = ast.node(ast.statements()[0]) else {
            panic!("expected a function call");
        };
        assert!(call.distinct);
        assert_eq!(call.name.lexeme, "COUNT");
        assert_eq!(ast.dump_statements(), "FunctionCall\n-Parenthesis\n--TokenLeaf\n--Column");
    }

    #[test]
    fn test_nested_calls() {
        let ast = parse_sql("COALESCE(MAX(a), 0)").unwrap();
        assert_eq!(
            ast.dump_statements(),
            "FunctionCall\n-Parenthesis\n--FunctionCall\n---Parenthesis\n----Column\n--TokenLeaf\n--Literal"
        );
    }

    #[test]
    fn test_count_star() {
        let ast = parse_sql("COUNT(*)").unwrap();
        assert_eq!(ast.dump_statements(), "FunctionCall\n-Parenthesis\n--AllColumnsSelector");
    }
}
