//! Turning a tree back into SQL text and into an indented kind dump.

use super::node::{Node, NodeId, NodeKind};
use super::tree::Ast;
use crate::lexer::TokenKind;

impl Ast {
    /// Renders a node back to SQL.
    ///
    /// Keywords and identifiers keep their original spelling; whitespace is
    /// normalized to single spaces, so re-parsing the output yields a tree
    /// with the same structure.
    #[must_use]
    pub fn to_sql(&self, id: NodeId) -> String {
        match self.node(id) {
            Node::TokenLeaf(token) => token.lexeme.clone(),
            Node::Column(c) => [&c.schema, &c.table]
                .into_iter()
                .flatten()
                .chain(std::iter::once(&c.column))
                .map(|t| t.lexeme.as_str())
                .collect::<Vec<_>>()
                .join("."),
            Node::Literal(l) => match &l.sign {
                Some(sign) => format!("{}{}", sign.lexeme, l.value.lexeme),
                None => l.value.lexeme.clone(),
            },
            Node::Operation(o) => format!(
                "{} {} {}",
                self.to_sql(o.left),
                o.operator.iter().map(|t| t.lexeme.as_str()).collect::<Vec<_>>().join(" "),
                self.to_sql(o.right)
            ),
            Node::InOperation(o) => {
                let not = o.not.as_ref().map_or(String::new(), |t| format!("{} ", t.lexeme));
                format!(
                    "{} {not}{} {}",
                    self.to_sql(o.left),
                    o.keyword.lexeme,
                    self.to_sql(o.list)
                )
            }
            Node::Conjunction(c) => {
                let mut out = String::new();
                for part in c.parts() {
                    if let Some(operator) = &part.operator {
                        out.push(' ');
                        out.push_str(&operator.lexeme);
                        out.push(' ');
                    }
                    // Only merged clauses nest conjunctions directly.
                    if self.kind(part.expression) == NodeKind::Conjunction {
                        out.push('(');
                        out.push_str(&self.to_sql(part.expression));
                        out.push(')');
                    } else {
                        out.push_str(&self.to_sql(part.expression));
                    }
                }
                out
            }
            Node::Parenthesis(p) => format!(
                "{}{}{}",
                p.open.lexeme,
                self.sequence_sql(&p.children),
                p.close.lexeme
            ),
            Node::FunctionCall(f) => format!("{}{}", f.name.lexeme, self.to_sql(f.arguments)),
            Node::AllColumnsSelector(a) => [&a.schema, &a.table]
                .into_iter()
                .flatten()
                .chain(std::iter::once(&a.star))
                .map(|t| t.lexeme.as_str())
                .collect::<Vec<_>>()
                .join("."),
            Node::Table(t) => match &t.schema {
                Some(schema) => format!("{}.{}", schema.lexeme, t.name.lexeme),
                None => t.name.lexeme.clone(),
            },
            Node::From(f) => {
                let mut out = format!("{} {}", f.keyword.lexeme, self.to_sql(f.source));
                push_alias(&mut out, f.alias.as_ref().map(|t| t.lexeme.as_str()));
                out
            }
            Node::Join(j) => {
                let keywords: Vec<&str> = j.keywords.iter().map(|t| t.lexeme.as_str()).collect();
                let mut out = format!("{} {}", keywords.join(" "), self.to_sql(j.source));
                push_alias(&mut out, j.alias.as_ref().map(|t| t.lexeme.as_str()));
                if let Some(condition) = &j.condition {
                    out.push_str(&format!(
                        " {} {}",
                        condition.keyword.lexeme,
                        self.to_sql(condition.expression)
                    ));
                }
                out
            }
            Node::Where(c) | Node::Having(c) => {
                format!("{} {}", c.keyword.lexeme, self.to_sql(c.expression))
            }
            Node::GroupBy(g) => format!(
                "{} {} {}",
                g.group.lexeme,
                g.by.lexeme,
                list_sql(g.expressions.iter().map(|&e| self.to_sql(e)))
            ),
            Node::OrderBy(o) => format!(
                "{} {} {}",
                o.order.lexeme,
                o.by.lexeme,
                list_sql(o.items.iter().map(|item| match &item.direction {
                    Some(direction) => format!("{} {}", self.to_sql(item.expression), direction.lexeme),
                    None => self.to_sql(item.expression),
                }))
            ),
            Node::Select(s) => {
                let mut out = s.keyword.lexeme.clone();
                if let Some(distinct) = &s.distinct {
                    out.push(' ');
                    out.push_str(&distinct.lexeme);
                }
                out.push(' ');
                out.push_str(&list_sql(s.columns.iter().map(|item| match &item.alias {
                    Some(alias) => format!("{} AS {}", self.to_sql(item.expression), alias.lexeme),
                    None => self.to_sql(item.expression),
                })));
                let clauses = s
                    .from
                    .iter()
                    .chain(&s.joins)
                    .chain(&s.where_clause)
                    .chain(&s.group_by)
                    .chain(&s.having)
                    .chain(&s.order_by);
                for &clause in clauses {
                    out.push(' ');
                    out.push_str(&self.to_sql(clause));
                }
                out
            }
            Node::Update(u) => {
                let mut out = format!("{} {}", u.keyword.lexeme, self.to_sql(u.table));
                push_alias(&mut out, u.alias.as_ref().map(|t| t.lexeme.as_str()));
                for &join in &u.joins {
                    out.push(' ');
                    out.push_str(&self.to_sql(join));
                }
                out.push(' ');
                out.push_str(&u.set.lexeme);
                out.push(' ');
                out.push_str(&list_sql(u.assignments.iter().map(|&a| self.to_sql(a))));
                for &clause in u.where_clause.iter().chain(&u.order_by) {
                    out.push(' ');
                    out.push_str(&self.to_sql(clause));
                }
                out
            }
            Node::Root(children) => self.sequence_sql(children),
        }
    }

    /// Renders branch children, attaching `,` and `;` to what precedes them.
    fn sequence_sql(&self, children: &[NodeId]) -> String {
        let mut out = String::new();
        for &child in children {
            let glued = matches!(
                self.token_kind(child),
                Some(TokenKind::Comma | TokenKind::Semicolon)
            );
            if !out.is_empty() && !glued {
                out.push(' ');
            }
            out.push_str(&self.to_sql(child));
        }
        out
    }

    /// Renders a subtree as one line per node: the node kind prefixed by one
    /// `-` per level of depth.
    ///
    /// ```
    /// let ast = oxide_sqltree::parse_sql("SELECT a FROM t").unwrap();
    /// let select = ast.statements()[0];
    /// assert!(ast.dump(select).starts_with("Select\n-Column\n-From\n--Table"));
    /// ```
    #[must_use]
    pub fn dump(&self, id: NodeId) -> String {
        let mut lines = Vec::new();
        self.walk(id, &mut |ast, node, depth| {
            lines.push(format!("{}{}", "-".repeat(depth), ast.kind(node)));
        });
        lines.join("\n")
    }

    /// Dumps every statement, each starting at depth zero.
    #[must_use]
    pub fn dump_statements(&self) -> String {
        self.statements()
            .into_iter()
            .map(|statement| self.dump(statement))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn list_sql(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn push_alias(out: &mut String, alias: Option<&str>) {
    if let Some(alias) = alias {
        out.push(' ');
        out.push_str(alias);
    }
}
