//! Node types stored in the tree arena.

use crate::error::InvariantViolation;
use crate::lexer::{Token, TokenKind};

/// Index of a node inside its [`Ast`](super::Ast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a node, without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    TokenLeaf,
    Column,
    Literal,
    Operation,
    InOperation,
    Conjunction,
    Parenthesis,
    FunctionCall,
    AllColumnsSelector,
    Table,
    From,
    Join,
    Where,
    Having,
    GroupBy,
    OrderBy,
    Select,
    Update,
    Root,
}

impl NodeKind {
    /// Returns the name used in tree dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TokenLeaf => "TokenLeaf",
            Self::Column => "Column",
            Self::Literal => "Literal",
            Self::Operation => "Operation",
            Self::InOperation => "InOperation",
            Self::Conjunction => "Conjunction",
            Self::Parenthesis => "Parenthesis",
            Self::FunctionCall => "FunctionCall",
            Self::AllColumnsSelector => "AllColumnsSelector",
            Self::Table => "Table",
            Self::From => "From",
            Self::Join => "Join",
            Self::Where => "Where",
            Self::Having => "Having",
            Self::GroupBy => "GroupBy",
            Self::OrderBy => "OrderBy",
            Self::Select => "Select",
            Self::Update => "Update",
            Self::Root => "Root",
        }
    }

    /// Returns true for kinds usable as an operand.
    #[must_use]
    pub const fn is_expression(self) -> bool {
        matches!(
            self,
            Self::Column
                | Self::Literal
                | Self::Operation
                | Self::InOperation
                | Self::Conjunction
                | Self::Parenthesis
                | Self::FunctionCall
                | Self::AllColumnsSelector
        )
    }

    /// Returns true for the clause kinds that can be merged.
    #[must_use]
    pub const fn is_mergeable(self) -> bool {
        matches!(self, Self::Where | Self::Having | Self::GroupBy)
    }
}

impl core::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A column reference: `column`, `table.column` or `schema.table.column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub schema: Option<Token>,
    pub table: Option<Token>,
    pub column: Token,
}

impl Column {
    /// Returns the unquoted column name.
    #[must_use]
    pub fn name(&self) -> String {
        self.column.unquoted()
    }

    /// Returns the unquoted table qualifier.
    #[must_use]
    pub fn table_name(&self) -> Option<String> {
        self.table.as_ref().map(Token::unquoted)
    }

    /// Returns the unquoted schema qualifier.
    #[must_use]
    pub fn schema_name(&self) -> Option<String> {
        self.schema.as_ref().map(Token::unquoted)
    }
}

/// A string, number, NULL or prepared-argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// A leading `-` or `+` folded into a numeric literal.
    pub sign: Option<Token>,
    pub value: Token,
}

impl Literal {
    /// Returns true for `NULL`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is(TokenKind::Null)
    }

    /// Returns true for `?` and `:name` placeholders.
    #[must_use]
    pub fn is_prepared_argument(&self) -> bool {
        self.value.is(TokenKind::PreparedArgument)
    }
}

/// A binary operation: `left op right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub left: NodeId,
    /// One token, or two for `IS NOT`, `NOT LIKE` and `NOT IN`.
    pub operator: Vec<Token>,
    pub right: NodeId,
}

impl Operation {
    /// Returns the operator upper-cased, words separated by a space.
    #[must_use]
    pub fn operator(&self) -> String {
        self.operator
            .iter()
            .map(|t| t.lexeme.to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns true for `=`.
    #[must_use]
    pub fn is_equality(&self) -> bool {
        matches!(self.operator.as_slice(), [op] if op.lexeme == "=")
    }
}

/// `left [NOT] IN (list)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InOperation {
    pub left: NodeId,
    pub not: Option<Token>,
    pub keyword: Token,
    /// A [`NodeKind::Parenthesis`] node.
    pub list: NodeId,
}

impl InOperation {
    /// Returns true for `NOT IN`.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.not.is_some()
    }
}

/// One operand of a conjunction with the `AND`/`OR` that introduces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConjunctionPart {
    /// `None` for the first part only.
    pub operator: Option<Token>,
    pub expression: NodeId,
}

impl ConjunctionPart {
    /// Returns `AND` or `OR`, or `None` for the leading part.
    #[must_use]
    pub fn operator_kind(&self) -> Option<TokenKind> {
        self.operator.as_ref().map(|t| t.kind)
    }
}

/// Expressions chained by `AND`/`OR`, left to right, without precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conjunction {
    parts: Vec<ConjunctionPart>,
}

impl Conjunction {
    /// Creates a conjunction.
    ///
    /// # Errors
    ///
    /// Fails with [`InvariantViolation::TooFewConjunctionParts`] for fewer
    /// than two parts.
    pub fn new(parts: Vec<ConjunctionPart>) -> Result<Self, InvariantViolation> {
        if parts.len() < 2 {
            return Err(InvariantViolation::TooFewConjunctionParts(parts.len()));
        }
        Ok(Self { parts })
    }

    /// Returns the parts in source order.
    #[must_use]
    pub fn parts(&self) -> &[ConjunctionPart] {
        &self.parts
    }

    /// Returns true when every joining operator is `AND`.
    #[must_use]
    pub fn is_and_only(&self) -> bool {
        self.parts
            .iter()
            .filter_map(ConjunctionPart::operator_kind)
            .all(|kind| kind == TokenKind::And)
    }
}

/// A bracketed span; its children are resolved as an independent branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parenthesis {
    pub open: Token,
    pub close: Token,
    pub(crate) children: Vec<NodeId>,
}

impl Parenthesis {
    /// Returns the bracketed nodes.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// `name(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: Token,
    /// Whether the argument list starts with `DISTINCT`.
    pub distinct: bool,
    /// A [`NodeKind::Parenthesis`] node.
    pub arguments: NodeId,
}

/// `*`, `table.*` or `schema.table.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllColumnsSelector {
    pub schema: Option<Token>,
    pub table: Option<Token>,
    pub star: Token,
}

/// A table reference: `name` or `schema.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub schema: Option<Token>,
    pub name: Token,
}

impl Table {
    /// Returns the unquoted table name.
    #[must_use]
    pub fn name(&self) -> String {
        self.name.unquoted()
    }

    /// Returns the unquoted schema qualifier.
    #[must_use]
    pub fn schema_name(&self) -> Option<String> {
        self.schema.as_ref().map(Token::unquoted)
    }
}

/// `FROM source [alias]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct From {
    pub keyword: Token,
    /// A [`NodeKind::Table`], or a [`NodeKind::Parenthesis`] subquery.
    pub source: NodeId,
    pub alias: Option<Token>,
}

/// The flavor of a join, taken from the words before `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Natural,
}

impl JoinType {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Cross => "CROSS",
            Self::Natural => "NATURAL",
        }
    }

    const fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Inner => Some(Self::Inner),
            TokenKind::Left => Some(Self::Left),
            TokenKind::Right => Some(Self::Right),
            TokenKind::Full => Some(Self::Full),
            TokenKind::Cross => Some(Self::Cross),
            TokenKind::Natural => Some(Self::Natural),
            _ => None,
        }
    }
}

/// `ON expr` or `USING (columns)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub keyword: Token,
    pub expression: NodeId,
}

/// `[type] JOIN source [alias] [ON|USING expr]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// The modifiers followed by the `JOIN` token itself.
    pub keywords: Vec<Token>,
    /// A [`NodeKind::Table`], or a [`NodeKind::Parenthesis`] subquery.
    pub source: NodeId,
    pub alias: Option<Token>,
    pub condition: Option<JoinCondition>,
}

impl Join {
    /// Returns the join type, or `None` for a bare `JOIN`.
    #[must_use]
    pub fn join_type(&self) -> Option<JoinType> {
        self.keywords.iter().find_map(|t| JoinType::from_kind(t.kind))
    }
}

/// The body of a `WHERE` or `HAVING` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub keyword: Token,
    pub expression: NodeId,
}

/// `GROUP BY expr, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    pub group: Token,
    pub by: Token,
    pub expressions: Vec<NodeId>,
}

/// Sort direction of an `ORDER BY` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// One `expr [ASC|DESC]` entry of an `ORDER BY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub expression: NodeId,
    pub direction: Option<Token>,
}

impl OrderItem {
    /// Returns the explicit direction, if any.
    #[must_use]
    pub fn direction(&self) -> Option<OrderDirection> {
        self.direction.as_ref().and_then(|t| match t.kind {
            TokenKind::Asc => Some(OrderDirection::Asc),
            TokenKind::Desc => Some(OrderDirection::Desc),
            _ => None,
        })
    }
}

/// `ORDER BY item, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub order: Token,
    pub by: Token,
    pub items: Vec<OrderItem>,
}

/// One entry of a select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub expression: NodeId,
    /// The name after `AS`.
    pub alias: Option<Token>,
}

/// A complete `SELECT` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub keyword: Token,
    pub distinct: Option<Token>,
    pub columns: Vec<SelectItem>,
    pub from: Option<NodeId>,
    pub joins: Vec<NodeId>,
    pub where_clause: Option<NodeId>,
    pub group_by: Option<NodeId>,
    pub having: Option<NodeId>,
    pub order_by: Option<NodeId>,
}

/// A complete `UPDATE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub keyword: Token,
    /// A [`NodeKind::Table`] node.
    pub table: NodeId,
    pub alias: Option<Token>,
    pub joins: Vec<NodeId>,
    pub set: Token,
    /// `column = expr` [`NodeKind::Operation`] nodes.
    pub assignments: Vec<NodeId>,
    pub where_clause: Option<NodeId>,
    pub order_by: Option<NodeId>,
}

/// A node of the tree.
///
/// Composite nodes refer to their sub-nodes by [`NodeId`]; only
/// [`Node::Parenthesis`] and [`Node::Root`] are branches whose child list
/// can be spliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    TokenLeaf(Token),
    Column(Column),
    Literal(Literal),
    Operation(Operation),
    InOperation(InOperation),
    Conjunction(Conjunction),
    Parenthesis(Parenthesis),
    FunctionCall(FunctionCall),
    AllColumnsSelector(AllColumnsSelector),
    Table(Table),
    From(From),
    Join(Join),
    Where(Condition),
    Having(Condition),
    GroupBy(GroupBy),
    OrderBy(OrderBy),
    Select(Select),
    Update(Update),
    Root(Vec<NodeId>),
}

/// A piece of node content in source order; drives hashing, child
/// enumeration and position lookup.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Part<'a> {
    Token(&'a Token),
    Child(NodeId),
    Absent,
    Mark(u8),
}

fn opt_token(token: Option<&Token>) -> Part<'_> {
    token.map_or(Part::Absent, Part::Token)
}

fn opt_child(id: Option<NodeId>) -> Part<'static> {
    id.map_or(Part::Absent, Part::Child)
}

impl Node {
    /// Returns the kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::TokenLeaf(_) => NodeKind::TokenLeaf,
            Self::Column(_) => NodeKind::Column,
            Self::Literal(_) => NodeKind::Literal,
            Self::Operation(_) => NodeKind::Operation,
            Self::InOperation(_) => NodeKind::InOperation,
            Self::Conjunction(_) => NodeKind::Conjunction,
            Self::Parenthesis(_) => NodeKind::Parenthesis,
            Self::FunctionCall(_) => NodeKind::FunctionCall,
            Self::AllColumnsSelector(_) => NodeKind::AllColumnsSelector,
            Self::Table(_) => NodeKind::Table,
            Self::From(_) => NodeKind::From,
            Self::Join(_) => NodeKind::Join,
            Self::Where(_) => NodeKind::Where,
            Self::Having(_) => NodeKind::Having,
            Self::GroupBy(_) => NodeKind::GroupBy,
            Self::OrderBy(_) => NodeKind::OrderBy,
            Self::Select(_) => NodeKind::Select,
            Self::Update(_) => NodeKind::Update,
            Self::Root(_) => NodeKind::Root,
        }
    }

    /// Returns the wrapped token of a leaf.
    #[must_use]
    pub const fn as_token(&self) -> Option<&Token> {
        match self {
            Self::TokenLeaf(token) => Some(token),
            _ => None,
        }
    }

    /// Returns the child list of a branch.
    #[must_use]
    pub fn branch_children(&self) -> Option<&[NodeId]> {
        match self {
            Self::Parenthesis(p) => Some(&p.children),
            Self::Root(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn branch_children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            Self::Parenthesis(p) => Some(&mut p.children),
            Self::Root(children) => Some(children),
            _ => None,
        }
    }

    /// Returns the direct sub-nodes in source order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        self.parts()
            .into_iter()
            .filter_map(|part| match part {
                Part::Child(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    #[allow(clippy::too_many_lines)]
    pub(crate) fn parts(&self) -> Vec<Part<'_>> {
        let mut parts = Vec::new();
        match self {
            Self::TokenLeaf(token) => parts.push(Part::Token(token)),
            Self::Column(c) => {
                parts.push(opt_token(c.schema.as_ref()));
                parts.push(opt_token(c.table.as_ref()));
                parts.push(Part::Token(&c.column));
            }
            Self::Literal(l) => {
                parts.push(opt_token(l.sign.as_ref()));
                parts.push(Part::Token(&l.value));
            }
            Self::Operation(o) => {
                parts.push(Part::Child(o.left));
                parts.extend(o.operator.iter().map(Part::Token));
                parts.push(Part::Child(o.right));
            }
            Self::InOperation(o) => {
                parts.push(Part::Child(o.left));
                parts.push(opt_token(o.not.as_ref()));
                parts.push(Part::Token(&o.keyword));
                parts.push(Part::Child(o.list));
            }
            Self::Conjunction(c) => {
                for part in &c.parts {
                    parts.push(opt_token(part.operator.as_ref()));
                    parts.push(Part::Child(part.expression));
                }
            }
            Self::Parenthesis(p) => {
                parts.push(Part::Token(&p.open));
                parts.extend(p.children.iter().copied().map(Part::Child));
                parts.push(Part::Token(&p.close));
            }
            Self::FunctionCall(f) => {
                parts.push(Part::Token(&f.name));
                parts.push(Part::Mark(u8::from(f.distinct)));
                parts.push(Part::Child(f.arguments));
            }
            Self::AllColumnsSelector(a) => {
                parts.push(opt_token(a.schema.as_ref()));
                parts.push(opt_token(a.table.as_ref()));
                parts.push(Part::Token(&a.star));
            }
            Self::Table(t) => {
                parts.push(opt_token(t.schema.as_ref()));
                parts.push(Part::Token(&t.name));
            }
            Self::From(f) => {
                parts.push(Part::Token(&f.keyword));
                parts.push(Part::Child(f.source));
                parts.push(opt_token(f.alias.as_ref()));
            }
            Self::Join(j) => {
                parts.extend(j.keywords.iter().map(Part::Token));
                parts.push(Part::Child(j.source));
                parts.push(opt_token(j.alias.as_ref()));
                match &j.condition {
                    Some(condition) => {
                        parts.push(Part::Token(&condition.keyword));
                        parts.push(Part::Child(condition.expression));
                    }
                    None => parts.push(Part::Absent),
                }
            }
            Self::Where(c) | Self::Having(c) => {
                parts.push(Part::Token(&c.keyword));
                parts.push(Part::Child(c.expression));
            }
            Self::GroupBy(g) => {
                parts.push(Part::Token(&g.group));
                parts.push(Part::Token(&g.by));
                parts.extend(g.expressions.iter().copied().map(Part::Child));
            }
            Self::OrderBy(o) => {
                parts.push(Part::Token(&o.order));
                parts.push(Part::Token(&o.by));
                for item in &o.items {
                    parts.push(Part::Child(item.expression));
                    parts.push(opt_token(item.direction.as_ref()));
                }
            }
            Self::Select(s) => {
                parts.push(Part::Token(&s.keyword));
                parts.push(opt_token(s.distinct.as_ref()));
                for item in &s.columns {
                    parts.push(Part::Child(item.expression));
                    parts.push(opt_token(item.alias.as_ref()));
                }
                parts.push(Part::Mark(0));
                parts.push(opt_child(s.from));
                parts.extend(s.joins.iter().copied().map(Part::Child));
                parts.push(Part::Mark(1));
                parts.push(opt_child(s.where_clause));
                parts.push(opt_child(s.group_by));
                parts.push(opt_child(s.having));
                parts.push(opt_child(s.order_by));
            }
            Self::Update(u) => {
                parts.push(Part::Token(&u.keyword));
                parts.push(Part::Child(u.table));
                parts.push(opt_token(u.alias.as_ref()));
                parts.extend(u.joins.iter().copied().map(Part::Child));
                parts.push(Part::Token(&u.set));
                parts.extend(u.assignments.iter().copied().map(Part::Child));
                parts.push(Part::Mark(0));
                parts.push(opt_child(u.where_clause));
                parts.push(opt_child(u.order_by));
            }
            Self::Root(children) => parts.extend(children.iter().copied().map(Part::Child)),
        }
        parts
    }

    /// Mutable references to every sub-node id.
    pub(crate) fn child_slots_mut(&mut self) -> Vec<&mut NodeId> {
        match self {
            Self::TokenLeaf(_)
            | Self::Column(_)
            | Self::Literal(_)
            | Self::AllColumnsSelector(_)
            | Self::Table(_) => Vec::new(),
            Self::Operation(o) => vec![&mut o.left, &mut o.right],
            Self::InOperation(o) => vec![&mut o.left, &mut o.list],
            Self::Conjunction(c) => c.parts.iter_mut().map(|p| &mut p.expression).collect(),
            Self::Parenthesis(p) => p.children.iter_mut().collect(),
            Self::FunctionCall(f) => vec![&mut f.arguments],
            Self::From(f) => vec![&mut f.source],
            Self::Join(j) => {
                let mut slots = vec![&mut j.source];
                if let Some(condition) = &mut j.condition {
                    slots.push(&mut condition.expression);
                }
                slots
            }
            Self::Where(c) | Self::Having(c) => vec![&mut c.expression],
            Self::GroupBy(g) => g.expressions.iter_mut().collect(),
            Self::OrderBy(o) => o.items.iter_mut().map(|i| &mut i.expression).collect(),
            Self::Select(s) => {
                let mut slots: Vec<&mut NodeId> =
                    s.columns.iter_mut().map(|c| &mut c.expression).collect();
                slots.extend(s.from.as_mut());
                slots.extend(s.joins.iter_mut());
                slots.extend(s.where_clause.as_mut());
                slots.extend(s.group_by.as_mut());
                slots.extend(s.having.as_mut());
                slots.extend(s.order_by.as_mut());
                slots
            }
            Self::Update(u) => {
                let mut slots = vec![&mut u.table];
                slots.extend(u.joins.iter_mut());
                slots.extend(u.assignments.iter_mut());
                slots.extend(u.where_clause.as_mut());
                slots.extend(u.order_by.as_mut());
                slots
            }
            Self::Root(children) => children.iter_mut().collect(),
        }
    }
}
