//! Tests for fixpoint stability, SQL regeneration and clause analysis.

mod common;
use common::*;

use oxide_sqltree::ast::ConjunctionPart;
use oxide_sqltree::lexer::TokenKind;
use oxide_sqltree::{InvariantViolation, MutationEngine, Node, NodeId};

const QUERIES: &[&str] = &[
    "SELECT a, b FROM t WHERE a = 1",
    "SELECT DISTINCT u.id, COUNT(o.id) AS n FROM app.users AS u LEFT OUTER JOIN orders o ON o.user_id = u.id \
     WHERE u.active = 1 AND (u.role = 'admin' OR u.role = 'owner') GROUP BY u.id HAVING COUNT(o.id) > 1 ORDER BY n DESC",
    "SELECT x.a FROM (SELECT a FROM t WHERE b IN (1, 2, 3)) x CROSS JOIN y",
    "UPDATE users u JOIN teams t ON t.id = u.team_id SET u.score = 0, u.note = NULL WHERE t.name LIKE 'a%' ORDER BY u.id",
    "SELECT * FROM a; UPDATE b SET c = -1;",
];

fn where_of(ast: &oxide_sqltree::Ast, statement: NodeId) -> NodeId {
    match ast.node(statement) {
        Node::Select(select) => select.where_clause.expect("a WHERE clause"),
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

#[test]
fn second_run_changes_nothing() {
    let engine = MutationEngine::default();
    for sql in QUERIES {
        let ast = parse(sql);
        let mut again = ast.clone();
        engine.run(&mut again).unwrap();
        assert_eq!(ast.hash(ast.root()), again.hash(again.root()), "For {sql}");
        assert_eq!(ast.dump_statements(), again.dump_statements(), "For {sql}");
    }
}

#[test]
fn to_sql_round_trips() {
    for sql in QUERIES {
        round_trip(sql);
    }
}

#[test]
fn to_sql_normalizes_layout() {
    let ast = parse("select  a ,\n  b\nfrom t   where a=1 ;");
    assert_eq!(ast.to_sql(ast.root()), "select a, b from t where a = 1;");
}

#[test]
fn equal_fragments_hash_equally() {
    let ast = parse("SELECT a FROM t WHERE x = 1; SELECT b FROM u WHERE x   =   1");
    let statements = ast.statements();
    let first = where_of(&ast, statements[0]);
    let second = where_of(&ast, statements[1]);
    assert_eq!(ast.hash(first), ast.hash(second));
    assert_ne!(ast.hash(statements[0]), ast.hash(statements[1]));
}

#[test]
fn merge_where_clauses() {
    let mut ast = parse("SELECT a FROM t WHERE a = 1; SELECT b FROM u WHERE b = 2");
    let statements = ast.statements();
    let this = where_of(&ast, statements[0]);
    let other = where_of(&ast, statements[1]);

    let merged = ast.merge(this, other).unwrap();
    assert_eq!(
        ast.dump(merged),
        "Where\n-Conjunction\n--Operation\n---Column\n---Literal\n--Operation\n---Column\n---Literal"
    );
    let Node::Where(condition) = ast.node(merged) else {
        panic!("Expected WHERE");
    };
    let Node::Conjunction(conjunction) = ast.node(condition.expression) else {
        panic!("Expected a conjunction");
    };
    let operators: Vec<Option<TokenKind>> = conjunction.parts().iter().map(ConjunctionPart::operator_kind).collect();
    assert_eq!(operators, vec![None, Some(TokenKind::And)]);

    assert_eq!(where_of(&ast, statements[0]), merged);
    assert_eq!(ast.to_sql(statements[0]), "SELECT a FROM t WHERE a = 1 AND b = 2");
    assert_eq!(ast.to_sql(statements[1]), "SELECT b FROM u WHERE b = 2");
}

#[test]
fn merge_having_clauses() {
    let mut ast = parse("HAVING a > 1; HAVING b < 2");
    let statements = ast.statements();
    let merged = ast.merge(statements[0], statements[1]).unwrap();
    assert_eq!(ast.to_sql(merged), "HAVING a > 1 AND b < 2");
    assert_eq!(ast.statements()[0], merged);
}

#[test]
fn merge_rejects_other_kinds() {
    let mut ast = parse("ORDER BY a; ORDER BY b");
    let statements = ast.statements();
    let err = ast.merge(statements[0], statements[1]).unwrap_err();
    assert!(matches!(err, InvariantViolation::NotMergeable { .. }));
}

#[test]
fn equations_through_joins_and_where() {
    let ast = parse(
        "SELECT a.x FROM a JOIN b ON (b.id = a.b_id) WHERE a.kind = 'k' AND a.size > 3 AND (b.flag = 1)",
    );
    let select = ast.statements()[0];
    let equations: Vec<String> = ast
        .fundamental_equations(select)
        .into_iter()
        .map(|id| ast.to_sql(id))
        .collect();
    assert_eq!(equations, vec!["b.id = a.b_id", "a.kind = 'k'", "b.flag = 1"]);
}

#[test]
fn equations_ignore_disjunctions_and_expressions() {
    let ast = parse("WHERE a = 1 OR b = 2; WHERE a + 1 = b; WHERE LOWER(a) = 'x'");
    for statement in ast.statements() {
        assert!(ast.fundamental_equations(statement).is_empty(), "For {}", ast.to_sql(statement));
    }
}

#[test]
fn walk_visits_parents_first() {
    let ast = parse("SELECT a FROM t");
    let mut seen = Vec::new();
    ast.walk(ast.statements()[0], &mut |ast, id, depth| seen.push((depth, ast.kind(id).name())));
    assert_eq!(seen, vec![(0, "Select"), (1, "Column"), (1, "From"), (2, "Table")]);
}
