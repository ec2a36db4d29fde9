//! Binding column references of a statement to the catalog.

use std::collections::BTreeMap;

use tracing::debug;

use crate::ast::{Ast, Node, NodeId};
use crate::error::ParsingError;
use crate::lexer::Token;
use crate::schema::{Column, Schemas, Table};

/// A column reference bound to its catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumn<'a> {
    /// The name the table is known by in the statement: its alias, or its
    /// own name.
    pub reference: &'a str,
    pub table: &'a Table,
    pub column: &'a Column,
}

/// The tables visible to one statement, keyed by alias or name.
#[derive(Debug, Clone)]
pub struct ExecutionContext<'a> {
    schemas: &'a Schemas,
    tables: BTreeMap<String, &'a Table>,
}

impl<'a> ExecutionContext<'a> {
    /// Creates a context with no table included.
    #[must_use]
    pub const fn new(schemas: &'a Schemas) -> Self {
        Self {
            schemas,
            tables: BTreeMap::new(),
        }
    }

    /// Creates a context including every FROM, JOIN and UPDATE table of a
    /// `Select` or `Update` node. Subquery sources are skipped.
    ///
    /// # Errors
    ///
    /// Fails at the first table missing from the catalog.
    pub fn from_statement(schemas: &'a Schemas, ast: &Ast, statement: NodeId) -> Result<Self, ParsingError> {
        let mut context = Self::new(schemas);
        let sources: Vec<(NodeId, Option<String>)> = match ast.node(statement) {
            Node::Select(select) => select
                .from
                .iter()
                .chain(&select.joins)
                .filter_map(|&clause| match ast.node(clause) {
                    Node::From(from) => Some((from.source, from.alias.as_ref().map(Token::unquoted))),
                    Node::Join(join) => Some((join.source, join.alias.as_ref().map(Token::unquoted))),
                    _ => None,
                })
                .collect(),
            Node::Update(update) => std::iter::once((update.table, update.alias.as_ref().map(Token::unquoted)))
                .chain(update.joins.iter().filter_map(|&join| match ast.node(join) {
                    Node::Join(join) => Some((join.source, join.alias.as_ref().map(Token::unquoted))),
                    _ => None,
                }))
                .collect(),
            _ => Vec::new(),
        };
        for (source, alias) in sources {
            if matches!(ast.node(source), Node::Table(_)) {
                context.include_table(ast, source, alias.as_deref())?;
            }
        }
        Ok(context)
    }

    /// Makes a catalog table visible under `alias`, or under its own name.
    ///
    /// Returns false if the catalog has no such table.
    pub fn include(&mut self, schema: Option<&str>, table: &str, alias: Option<&str>) -> bool {
        let Some(found) = self.schemas.table(schema, table) else {
            return false;
        };
        let reference = alias.unwrap_or(table);
        debug!(table, reference, "Included table");
        self.tables.insert(reference.to_owned(), found);
        true
    }

    /// Includes the table referenced by a `Table` node.
    ///
    /// # Errors
    ///
    /// Fails, located at the node, when it is not a table or the catalog
    /// does not know it.
    pub fn include_table(&mut self, ast: &Ast, table: NodeId, alias: Option<&str>) -> Result<(), ParsingError> {
        let Node::Table(node) = ast.node(table) else {
            return Err(ast.error_at(table, format!("expected a table, found {}", ast.kind(table))));
        };
        let name = node.name();
        if self.include(node.schema_name().as_deref(), &name, alias) {
            Ok(())
        } else {
            Err(ast.error_at(table, format!("unknown table '{name}'")))
        }
    }

    /// Returns the references of the included tables.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Looks up an included table by alias or name.
    #[must_use]
    pub fn table(&self, reference: &str) -> Option<&'a Table> {
        self.tables.get(reference).copied()
    }

    /// Binds a `Column` node to the catalog.
    ///
    /// A qualified column must name an included table. An unqualified one
    /// must belong to exactly one included table.
    ///
    /// # Errors
    ///
    /// Fails, located at the node, for unknown tables and columns and for
    /// ambiguous unqualified columns.
    pub fn resolve_column(&self, ast: &Ast, column: NodeId) -> Result<ResolvedColumn<'_>, ParsingError> {
        let Node::Column(node) = ast.node(column) else {
            return Err(ast.error_at(column, format!("expected a column, found {}", ast.kind(column))));
        };
        let name = node.name();

        if let Some(reference) = node.table_name() {
            let Some((reference, table)) = self.tables.get_key_value(reference.as_str()) else {
                return Err(ast.error_at(column, format!("unknown table '{reference}'")));
            };
            return table
                .column(&name)
                .map(|found| ResolvedColumn {
                    reference: reference.as_str(),
                    table: *table,
                    column: found,
                })
                .ok_or_else(|| ast.error_at(column, format!("unknown column '{reference}.{name}'")));
        }

        let mut candidates = self
            .tables
            .iter()
            .filter_map(|(reference, table)| {
                table.column(&name).map(|found| ResolvedColumn {
                    reference: reference.as_str(),
                    table: *table,
                    column: found,
                })
            });
        match (candidates.next(), candidates.next()) {
            (Some(resolved), None) => Ok(resolved),
            (None, _) => Err(ast.error_at(column, format!("unknown column '{name}'"))),
            (Some(_), Some(_)) => Err(ast.error_at(column, format!("ambiguous column '{name}'"))),
        }
    }

    /// Returns true when both columns are unique and not nullable, so each
    /// row on one side matches at most one row on the other.
    ///
    /// Tables are given by their reference in this context. Unknown tables
    /// or columns yield false.
    #[must_use]
    pub fn is_one_to_one_relation(
        &self,
        left_table: &str,
        left_column: &str,
        right_table: &str,
        right_column: &str,
    ) -> bool {
        let identifying = |table: &str, column: &str| {
            self.table(table)
                .and_then(|t| t.column(column))
                .is_some_and(Column::is_identifying)
        };
        identifying(left_table, left_column) && identifying(right_table, right_column)
    }

    /// Checks a `column = column` equation with [`Self::is_one_to_one_relation`].
    ///
    /// # Errors
    ///
    /// Fails when a side cannot be resolved.
    pub fn is_one_to_one_equation(&self, ast: &Ast, equation: NodeId) -> Result<bool, ParsingError> {
        let Node::Operation(operation) = ast.node(equation) else {
            return Ok(false);
        };
        if !operation.is_equality()
            || !matches!(ast.node(operation.left), Node::Column(_))
            || !matches!(ast.node(operation.right), Node::Column(_))
        {
            return Ok(false);
        }
        let left = self.resolve_column(ast, operation.left)?;
        let right = self.resolve_column(ast, operation.right)?;
        Ok(self.is_one_to_one_relation(left.reference, &left.column.name, right.reference, &right.column.name))
    }
}
