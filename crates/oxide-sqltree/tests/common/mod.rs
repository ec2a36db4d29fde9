#![allow(dead_code)]

use oxide_sqltree::ast::{Select, Update};
use oxide_sqltree::{parse_sql, Ast, Error, Node, NodeId};

pub fn parse(sql: &str) -> Ast {
    parse_sql(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> Error {
    parse_sql(sql).expect_err(&format!("Expected parse error for: {sql}"))
}

/// Returns the single statement of `sql`.
pub fn statement(sql: &str) -> (Ast, NodeId) {
    let ast = parse(sql);
    let statements = ast.statements();
    assert_eq!(statements.len(), 1, "Expected one statement in: {sql}\n{}", ast.dump_statements());
    let id = statements[0];
    (ast, id)
}

pub fn parse_select(sql: &str) -> (Ast, Select) {
    let (ast, id) = statement(sql);
    match ast.node(id).clone() {
        Node::Select(s) => (ast, s),
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> (Ast, Update) {
    let (ast, id) = statement(sql);
    match ast.node(id).clone() {
        Node::Update(u) => (ast, u),
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

/// Dumps every statement of `sql`.
pub fn dump(sql: &str) -> String {
    parse(sql).dump_statements()
}

/// Verifies that `to_sql()` re-parses into a tree of the same shape and
/// renders the same text again.
pub fn round_trip(sql: &str) {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_sql(ast1.root());
    let ast2 = parse(&rendered1);
    let rendered2 = ast2.to_sql(ast2.root());
    assert_eq!(
        ast1.dump_statements(),
        ast2.dump_statements(),
        "Shape changed.\n  Input:    {sql}\n  Rendered: {rendered1}"
    );
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}
