//! Tests for expressions outside of statements.

mod common;
use common::*;

use oxide_sqltree::{Node, NodeKind};

#[test]
fn comparison_operators() {
    for op in ["=", "!=", "<>", "<", "<=", ">", ">=", "<=>"] {
        let (ast, id) = statement(&format!("a {op} 1"));
        let Node::Operation(operation) = ast.node(id) else {
            panic!("Expected an operation for {op}");
        };
        assert_eq!(operation.operator(), op);
    }
}

#[test]
fn arithmetic_is_left_to_right() {
    // No precedence: (a + b) * c.
    let (ast, id) = statement("a + b * c");
    let Node::Operation(outer) = ast.node(id) else {
        panic!("Expected an operation");
    };
    assert_eq!(outer.operator(), "*");
    assert_eq!(ast.to_sql(outer.left), "a + b");
}

#[test]
fn compound_operators() {
    let (ast, id) = statement("a IS NOT NULL");
    let Node::Operation(operation) = ast.node(id) else {
        panic!("Expected an operation");
    };
    assert_eq!(operation.operator(), "IS NOT");

    let (ast, id) = statement("name not like 'a%'");
    let Node::Operation(operation) = ast.node(id) else {
        panic!("Expected an operation");
    };
    assert_eq!(operation.operator(), "NOT LIKE");
}

#[test]
fn in_list() {
    assert_eq!(
        dump("a IN (1, 2, ?)"),
        "InOperation\n-Column\n-Parenthesis\n--Literal\n--TokenLeaf\n--Literal\n--TokenLeaf\n--Literal"
    );
}

#[test]
fn signed_literals() {
    let (ast, id) = statement("-1");
    let Node::Literal(literal) = ast.node(id) else {
        panic!("Expected a literal, got {}", ast.kind(id));
    };
    assert_eq!(literal.sign.as_ref().unwrap().lexeme, "-");
    assert_eq!(dump("a - 1"), "Operation\n-Column\n-Literal");
    assert_eq!(dump("a = -1"), "Operation\n-Column\n-Literal");
}

#[test]
fn placeholders_and_null_are_literals() {
    for sql in ["?", ":name", "NULL", "'text'", "3.5"] {
        let (ast, id) = statement(sql);
        assert_eq!(ast.kind(id), NodeKind::Literal, "For {sql}");
    }
}

#[test]
fn conjunction_keeps_order() {
    assert_eq!(
        dump("a = 1 OR b = 2 AND c = 3"),
        "Conjunction\n-Operation\n--Column\n--Literal\n-Operation\n--Column\n--Literal\n-Operation\n--Column\n--Literal"
    );
}

#[test]
fn brackets_group_conjunctions() {
    assert_eq!(
        dump("(a = 1 OR b = 2) AND c = 3"),
        "Conjunction\n-Parenthesis\n--Conjunction\n---Operation\n----Column\n----Literal\n---Operation\n----Column\n----Literal\n-Operation\n--Column\n--Literal"
    );
}

#[test]
fn deeply_nested_brackets() {
    let sql = format!("SELECT a FROM t WHERE {}x = 1{}", "(".repeat(16), ")".repeat(16));
    let (ast, id) = statement(&sql);
    assert_eq!(ast.kind(id), NodeKind::Select);
    assert_eq!(ast.to_sql(id), sql);
    let brackets = ast.dump(id).lines().filter(|line| line.ends_with("Parenthesis")).count();
    assert_eq!(brackets, 16);
}

#[test]
fn nested_function_calls() {
    assert_eq!(
        dump("UPPER(TRIM(name))"),
        "FunctionCall\n-Parenthesis\n--FunctionCall\n---Parenthesis\n----Column"
    );
}

#[test]
fn empty_argument_list() {
    let (ast, id) = statement("NOW()");
    assert_eq!(ast.kind(id), NodeKind::FunctionCall);
    assert_eq!(ast.to_sql(id), "NOW()");
}

#[test]
fn backtick_names() {
    let (ast, id) = statement("`my table`.`select`");
    let Node::Column(column) = ast.node(id) else {
        panic!("Expected a column");
    };
    assert_eq!(column.table_name().as_deref(), Some("my table"));
    assert_eq!(column.name(), "select");
}

#[test]
fn comments_are_ignored() {
    assert_eq!(dump("a /* x */ = -- y\n 1"), dump("a = 1"));
}
