//! Clause merging and equality extraction over a parsed tree.

use super::node::{Conjunction, ConjunctionPart, GroupBy, Node, NodeId, NodeKind};
use super::tree::Ast;
use crate::error::InvariantViolation;
use crate::lexer::{Token, TokenKind};

impl Ast {
    /// Merges the clause `other` into the clause `this`.
    ///
    /// `WHERE a` merged with `WHERE b` becomes `WHERE a AND b`, likewise for
    /// `HAVING`; `GROUP BY` lists are concatenated. Either side may itself be
    /// a conjunction; it becomes one part of the new one and renders in
    /// brackets. `other` is deep-copied
    /// and left untouched. When `this` is attached it is replaced in its
    /// parent by the merged clause, whose id is returned.
    ///
    /// # Errors
    ///
    /// Fails when the kinds differ or are not `Where`, `Having` or
    /// `GroupBy`.
    pub fn merge(&mut self, this: NodeId, other: NodeId) -> Result<NodeId, InvariantViolation> {
        let left = self.kind(this);
        let right = self.kind(other);
        if left != right || !left.is_mergeable() {
            return Err(InvariantViolation::NotMergeable { left, right });
        }

        let merged = match (self.node(this).clone(), self.node(other).clone()) {
            (Node::Where(mut target), Node::Where(source))
            | (Node::Having(mut target), Node::Having(source)) => {
                let copy = self.clone_subtree(source.expression);
                let and = Token::new(TokenKind::And, "AND", self.position(other));
                let conjunction = Conjunction::new(vec![
                    ConjunctionPart {
                        operator: None,
                        expression: target.expression,
                    },
                    ConjunctionPart {
                        operator: Some(and),
                        expression: copy,
                    },
                ])?;
                target.expression = self.insert(Node::Conjunction(conjunction));
                if left == NodeKind::Where {
                    Node::Where(target)
                } else {
                    Node::Having(target)
                }
            }
            (Node::GroupBy(target), Node::GroupBy(source)) => {
                let mut expressions = target.expressions;
                for expression in source.expressions {
                    expressions.push(self.clone_subtree(expression));
                }
                Node::GroupBy(GroupBy {
                    group: target.group,
                    by: target.by,
                    expressions,
                })
            }
            _ => return Err(InvariantViolation::NotMergeable { left, right }),
        };

        let merged = self.insert(merged);
        if self.parent(this).is_some() {
            self.substitute(this, merged)?;
        }
        Ok(merged)
    }

    /// Collects the `=` operations between columns and literals that must
    /// all hold for the expression to be true.
    ///
    /// Descends through `AND`-only conjunctions, single-item brackets,
    /// `WHERE`/`HAVING` clauses, `ON` join conditions and the joins and
    /// `WHERE` of a `SELECT`. A conjunction containing any `OR` contributes
    /// nothing.
    #[must_use]
    pub fn fundamental_equations(&self, id: NodeId) -> Vec<NodeId> {
        let mut equations = Vec::new();
        self.collect_equations(id, &mut equations);
        equations
    }

    fn collect_equations(&self, id: NodeId, equations: &mut Vec<NodeId>) {
        match self.node(id) {
            Node::Operation(operation) => {
                if operation.is_equality()
                    && self.is_equation_side(operation.left)
                    && self.is_equation_side(operation.right)
                {
                    equations.push(id);
                }
            }
            Node::Conjunction(conjunction) if conjunction.is_and_only() => {
                for part in conjunction.parts() {
                    self.collect_equations(part.expression, equations);
                }
            }
            Node::Parenthesis(parenthesis) => {
                if let [single] = parenthesis.children.as_slice() {
                    self.collect_equations(*single, equations);
                }
            }
            Node::Where(condition) | Node::Having(condition) => {
                self.collect_equations(condition.expression, equations);
            }
            Node::Join(join) => {
                if let Some(condition) = &join.condition {
                    if condition.keyword.is(TokenKind::On) {
                        self.collect_equations(condition.expression, equations);
                    }
                }
            }
            Node::Select(select) => {
                for &clause in select.joins.iter().chain(&select.where_clause) {
                    self.collect_equations(clause, equations);
                }
            }
            _ => {}
        }
    }

    fn is_equation_side(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Column | NodeKind::Literal)
    }
}
