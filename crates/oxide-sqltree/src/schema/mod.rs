//! Catalog model used to bind parsed columns to tables.
//!
//! The catalog is plain data: build it in code or deserialize it from JSON.
//! Nothing here talks to a database.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const fn default_nullable() -> bool {
    true
}

/// A column of a catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Whether the column accepts NULL. Defaults to true.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Whether the column has a UNIQUE constraint or is the primary key.
    #[serde(default)]
    pub unique: bool,
}

impl Column {
    /// Creates a nullable, non-unique column.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            unique: false,
        }
    }

    /// Sets whether the column accepts NULL.
    #[must_use]
    pub const fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets whether the column is unique.
    #[must_use]
    pub const fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Returns true if every row holds a distinct, non-NULL value.
    #[must_use]
    pub const fn is_identifying(&self) -> bool {
        self.unique && !self.nullable
    }
}

/// A catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a table without columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A named group of tables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Tables keyed by name, sorted for deterministic iteration.
    #[serde(default)]
    pub tables: BTreeMap<String, Table>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, replacing one of the same name.
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}

/// Every schema known to the context.
///
/// Unqualified table names are looked up in `default_schema`, or in the
/// only schema when there is exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schemas {
    /// Schema searched for unqualified table names.
    #[serde(default)]
    pub default_schema: Option<String>,
    /// Schemas keyed by name.
    #[serde(default)]
    pub schemas: BTreeMap<String, Schema>,
}

impl Schemas {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema, replacing one of the same name.
    pub fn add_schema(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    /// Looks up a schema by name, or the default one for `None`.
    #[must_use]
    pub fn schema(&self, name: Option<&str>) -> Option<&Schema> {
        match name.or(self.default_schema.as_deref()) {
            Some(name) => self.schemas.get(name),
            None if self.schemas.len() == 1 => self.schemas.values().next(),
            None => None,
        }
    }

    /// Looks up a table, optionally schema-qualified.
    #[must_use]
    pub fn table(&self, schema: Option<&str>, name: &str) -> Option<&Table> {
        self.schema(schema).and_then(|s| s.table(name))
    }
}
