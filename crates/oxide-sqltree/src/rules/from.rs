use super::{alias_at, leaf_token, source_at};
use crate::ast::{Ast, From, Node, NodeId};
use crate::engine::Mutator;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Folds `FROM table [[AS] alias]` and `FROM (subquery) [[AS] alias]` into
/// a [`From`].
pub struct FromMutator;

impl Mutator for FromMutator {
    fn name(&self) -> &'static str {
        "from"
    }

    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()> {
        if ast.token_kind(node) != Some(TokenKind::From) {
            return Ok(());
        }
        let Some(source) = source_at(ast, parent, offset + 1, true)? else {
            return Ok(());
        };
        let alias = alias_at(ast, parent, offset + 2, true)?;
        let Some(keyword) = leaf_token(ast, parent, offset) else {
            return Ok(());
        };

        let width = 2 + alias.as_ref().map_or(0, |a| a.width);
        let source = source.into_node(ast);
        let from = ast.insert(Node::From(From {
            keyword,
            source,
            alias: alias.map(|a| a.token),
        }));
        ast.replace(parent, offset, width, from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Node;
    use crate::parse_sql;

    #[test]
    fn test_schema_qualified_table_with_alias() {
        let ast = parse_sql("FROM app.users AS u").unwrap();
        let Node::From(from) = ast.node(ast.statements()[0]) else {
            panic!("expected a from clause");
        };
        let Node::Table(table) = ast.node(from.source) else {
            panic!("expected a table");
        };
        assert_eq!(table.schema_name().as_deref(), Some("app"));
        assert_eq!(table.name(), "users");
        assert_eq!(from.alias.as_ref().unwrap().lexeme, "u");
    }

    #[test]
    fn test_subquery_source() {
        let ast = parse_sql("FROM (SELECT a FROM t) s").unwrap();
        assert_eq!(
            ast.dump_statements(),
            "From\n-Parenthesis\n--Select\n---Column\n---From\n----Table"
        );
    }

    #[test]
    fn test_three_part_table_fails() {
        let err = parse_sql("FROM a.b.c").unwrap_err();
        assert!(err.to_string().starts_with("too many qualifiers for a table name"));
    }
}
