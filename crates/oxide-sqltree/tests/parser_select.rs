//! Tests for SELECT statements.

mod common;
use common::*;

use oxide_sqltree::ast::{JoinType, OrderDirection};
use oxide_sqltree::lexer::TokenKind;
use oxide_sqltree::{Node, NodeKind};

const REPORT: &str = "SELECT u.name, u.email, f.name, f.size
FROM users u
LEFT JOIN files f ON(u.id = f.owner_id)
WHERE f.name LIKE '%.pdf'
AND f.type = 'symbolic'
OR f.foo IS NULL
ORDER BY f.size DESC, f.owner ASC";

#[test]
fn select_report_columns() {
    let (ast, select) = parse_select(REPORT);
    let columns: Vec<String> = select.columns.iter().map(|c| ast.to_sql(c.expression)).collect();
    assert_eq!(columns, vec!["u.name", "u.email", "f.name", "f.size"]);
    assert!(select.columns.iter().all(|c| ast.kind(c.expression) == NodeKind::Column));
}

#[test]
fn select_report_from() {
    let (ast, select) = parse_select(REPORT);
    let Node::From(from) = ast.node(select.from.unwrap()) else {
        panic!("Expected FROM");
    };
    let Node::Table(table) = ast.node(from.source) else {
        panic!("Expected a table");
    };
    assert_eq!(table.name(), "users");
    assert_eq!(from.alias.as_ref().unwrap().lexeme, "u");
}

#[test]
fn select_report_join() {
    let (ast, select) = parse_select(REPORT);
    assert_eq!(select.joins.len(), 1);
    let Node::Join(join) = ast.node(select.joins[0]) else {
        panic!("Expected JOIN");
    };
    assert_eq!(join.join_type(), Some(JoinType::Left));
    assert_eq!(ast.to_sql(join.source), "files");
    assert_eq!(join.alias.as_ref().unwrap().lexeme, "f");
    let condition = join.condition.as_ref().unwrap();
    assert!(condition.keyword.is(TokenKind::On));
    assert_eq!(ast.to_sql(condition.expression), "(u.id = f.owner_id)");
}

#[test]
fn select_report_where_is_flat_conjunction() {
    let (ast, select) = parse_select(REPORT);
    let Node::Where(condition) = ast.node(select.where_clause.unwrap()) else {
        panic!("Expected WHERE");
    };
    let Node::Conjunction(conjunction) = ast.node(condition.expression) else {
        panic!("Expected a conjunction");
    };
    let parts: Vec<(Option<TokenKind>, String)> = conjunction
        .parts()
        .iter()
        .map(|part| {
            let Node::Operation(operation) = ast.node(part.expression) else {
                panic!("Expected an operation");
            };
            (part.operator_kind(), operation.operator())
        })
        .collect();
    assert_eq!(
        parts,
        vec![
            (None, "LIKE".to_string()),
            (Some(TokenKind::And), "=".to_string()),
            (Some(TokenKind::Or), "IS".to_string()),
        ]
    );
}

#[test]
fn select_report_order_by() {
    let (ast, select) = parse_select(REPORT);
    let Node::OrderBy(order_by) = ast.node(select.order_by.unwrap()) else {
        panic!("Expected ORDER BY");
    };
    let items: Vec<(String, Option<OrderDirection>)> = order_by
        .items
        .iter()
        .map(|item| (ast.to_sql(item.expression), item.direction()))
        .collect();
    assert_eq!(
        items,
        vec![
            ("f.size".to_string(), Some(OrderDirection::Desc)),
            ("f.owner".to_string(), Some(OrderDirection::Asc)),
        ]
    );
}

#[test]
fn select_report_has_no_other_clauses() {
    let (_, select) = parse_select(REPORT);
    assert!(select.distinct.is_none());
    assert!(select.group_by.is_none());
    assert!(select.having.is_none());
}

#[test]
fn dotted_column_has_three_parts() {
    let (ast, id) = statement("a.b.c");
    let Node::Column(column) = ast.node(id) else {
        panic!("Expected a column, got {}", ast.kind(id));
    };
    assert_eq!(column.schema_name().as_deref(), Some("a"));
    assert_eq!(column.table_name().as_deref(), Some("b"));
    assert_eq!(column.name(), "c");
}

#[test]
fn select_star_and_qualified_star() {
    assert_eq!(
        dump("SELECT *, t.* FROM t"),
        "Select\n-AllColumnsSelector\n-AllColumnsSelector\n-From\n--Table"
    );
}

#[test]
fn select_without_from() {
    assert_eq!(dump("SELECT 1 + 2"), "Select\n-Operation\n--Literal\n--Literal");
}

#[test]
fn select_aliases() {
    let (ast, select) = parse_select("SELECT COUNT(DISTINCT id) AS total, name AS n FROM users AS u");
    let aliases: Vec<&str> = select
        .columns
        .iter()
        .map(|c| c.alias.as_ref().unwrap().lexeme.as_str())
        .collect();
    assert_eq!(aliases, vec!["total", "n"]);
    let Node::FunctionCall(call) = ast.node(select.columns[0].expression) else {
        panic!("Expected a function call");
    };
    assert!(call.distinct);
}

#[test]
fn select_group_by_having() {
    assert_eq!(
        dump("SELECT a, COUNT(*) FROM t GROUP BY a HAVING COUNT(*) > 1"),
        "Select\n-Column\n-FunctionCall\n--Parenthesis\n---AllColumnsSelector\n-From\n--Table\n\
         -GroupBy\n--Column\n-Having\n--Operation\n---FunctionCall\n----Parenthesis\n-----AllColumnsSelector\n---Literal"
    );
}

#[test]
fn select_multiple_joins() {
    let (ast, select) = parse_select(
        "SELECT a.x FROM a INNER JOIN b ON b.id = a.b_id RIGHT OUTER JOIN c USING (id) CROSS JOIN d",
    );
    let types: Vec<Option<JoinType>> = select
        .joins
        .iter()
        .map(|&id| match ast.node(id) {
            Node::Join(join) => join.join_type(),
            other => panic!("Expected JOIN, got {other:?}"),
        })
        .collect();
    assert_eq!(types, vec![Some(JoinType::Inner), Some(JoinType::Right), Some(JoinType::Cross)]);
}

#[test]
fn select_subquery_source() {
    let (ast, select) = parse_select("SELECT s.a FROM (SELECT a FROM t WHERE b = 1) s");
    let Node::From(from) = ast.node(select.from.unwrap()) else {
        panic!("Expected FROM");
    };
    assert_eq!(ast.kind(from.source), NodeKind::Parenthesis);
    assert_eq!(from.alias.as_ref().unwrap().lexeme, "s");
}

#[test]
fn select_in_subquery() {
    let (ast, select) = parse_select("SELECT a FROM t WHERE b NOT IN (SELECT b FROM u)");
    let Node::Where(condition) = ast.node(select.where_clause.unwrap()) else {
        panic!("Expected WHERE");
    };
    let Node::InOperation(operation) = ast.node(condition.expression) else {
        panic!("Expected IN");
    };
    assert!(operation.is_negated());
}

#[test]
fn statements_split_on_semicolons() {
    let ast = parse("SELECT a FROM t; SELECT b FROM u;");
    let kinds: Vec<NodeKind> = ast.statements().iter().map(|&id| ast.kind(id)).collect();
    assert_eq!(kinds, vec![NodeKind::Select, NodeKind::Select]);
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(dump("select a from t where a = 1"), dump("SELECT a FROM t WHERE a = 1"));
}
