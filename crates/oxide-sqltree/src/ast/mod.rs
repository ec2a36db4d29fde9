//! The syntax tree.
//!
//! All nodes live in an [`Ast`] arena and refer to each other by
//! [`NodeId`]. The tree starts as a flat list of token leaves under a
//! single root and is folded into typed nodes by the
//! [`MutationEngine`](crate::engine::MutationEngine).

mod analysis;
mod node;
mod render;
mod tree;

pub use node::{
    AllColumnsSelector, Column, Condition, Conjunction, ConjunctionPart, From, FunctionCall,
    GroupBy, InOperation, Join, JoinCondition, JoinType, Literal, Node, NodeId, NodeKind,
    Operation, OrderBy, OrderDirection, OrderItem, Parenthesis, Select, SelectItem, Table, Update,
};
pub use tree::{Ast, Phase};
