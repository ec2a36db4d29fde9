//! The node arena, its lifecycle and the splice primitive.

use std::cell::Cell;

use tracing::trace;
use xxhash_rust::xxh3::xxh3_64;

use super::node::{Node, NodeId, NodeKind, Part};
use crate::error::{InvariantViolation, ParsingError};
use crate::lexer::{Position, Token, TokenKind, TokenStream};

/// Lifecycle of an [`Ast`].
///
/// Tokens may only be appended while lexing; children may only be spliced
/// once lexing is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexing,
    Parsing,
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    hash: Cell<Option<u64>>,
}

/// An arena-backed syntax tree rooted at a single `Root` branch.
///
/// Every node lives in the arena and is addressed by [`NodeId`]. Nodes
/// removed by [`Ast::replace`] stay in the arena but are detached: their
/// parent link is cleared.
#[derive(Debug, Clone)]
pub struct Ast {
    slots: Vec<Slot>,
    tokens: TokenStream,
    phase: Phase,
}

const ROOT: NodeId = NodeId(0);

impl Ast {
    /// Creates an empty tree in the lexing phase over `tokens`.
    ///
    /// The stream is kept for diagnostics only; leaves are added with
    /// [`Ast::add_token`].
    #[must_use]
    pub fn new(tokens: TokenStream) -> Self {
        Self {
            slots: vec![Slot {
                node: Node::Root(Vec::new()),
                parent: None,
                hash: Cell::new(None),
            }],
            tokens,
            phase: Phase::Lexing,
        }
    }

    /// Builds a tree holding one leaf per significant token, ready for
    /// parsing. Whitespace and comments are skipped.
    #[must_use]
    pub fn from_tokens(tokens: TokenStream) -> Self {
        let significant: Vec<Token> = tokens
            .iter()
            .filter(|token| !token.kind.is_trivia())
            .cloned()
            .collect();
        let mut ast = Self::new(tokens);
        for token in significant {
            ast.push_leaf(token);
        }
        ast.mark_lexing_finished();
        ast
    }

    /// Appends a token leaf to the root.
    ///
    /// # Errors
    ///
    /// Fails once lexing is finished.
    pub fn add_token(&mut self, token: Token) -> Result<NodeId, InvariantViolation> {
        if self.phase != Phase::Lexing {
            return Err(InvariantViolation::WrongPhase {
                operation: "add_token",
                actual: self.phase,
            });
        }
        Ok(self.push_leaf(token))
    }

    fn push_leaf(&mut self, token: Token) -> NodeId {
        let id = self.insert(Node::TokenLeaf(token));
        self.slots[id.0].parent = Some(ROOT);
        if let Node::Root(children) = &mut self.slots[ROOT.0].node {
            children.push(id);
        }
        self.invalidate(ROOT);
        id
    }

    /// Moves the tree into the parsing phase. Idempotent.
    pub fn mark_lexing_finished(&mut self) {
        self.phase = Phase::Parsing;
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the root branch.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        ROOT
    }

    /// Returns the originating token stream.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Returns the SQL the tree was built from.
    #[must_use]
    pub fn sql(&self) -> &str {
        self.tokens.sql()
    }

    /// Adds a detached node to the arena.
    ///
    /// The node's sub-nodes are re-parented to it.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.slots.len());
        for child in node.children() {
            self.slots[child.0].parent = Some(id);
        }
        self.slots.push(Slot {
            node,
            parent: None,
            hash: Cell::new(None),
        });
        id
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.slots[id.0].node
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    /// Returns the token of a leaf.
    #[must_use]
    pub fn token(&self, id: NodeId) -> Option<&Token> {
        self.node(id).as_token()
    }

    /// Returns the token kind of a leaf.
    #[must_use]
    pub fn token_kind(&self, id: NodeId) -> Option<TokenKind> {
        self.token(id).map(|token| token.kind)
    }

    /// Returns the parent of a node, or `None` for the root and for
    /// detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    /// Iterates over the ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Returns the direct sub-nodes of any node, in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).children()
    }

    /// Returns true for `Root` and `Parenthesis` nodes.
    #[must_use]
    pub fn is_branch(&self, id: NodeId) -> bool {
        self.node(id).branch_children().is_some()
    }

    /// Returns the number of children of a branch, or 0 for other nodes.
    #[must_use]
    pub fn len(&self, branch: NodeId) -> usize {
        self.node(branch).branch_children().map_or(0, <[NodeId]>::len)
    }

    /// Returns the child of a branch at `offset`.
    #[must_use]
    pub fn get(&self, branch: NodeId, offset: usize) -> Option<NodeId> {
        self.node(branch)
            .branch_children()
            .and_then(|children| children.get(offset))
            .copied()
    }

    /// Returns true if a branch has a child at `offset`.
    #[must_use]
    pub fn has(&self, branch: NodeId, offset: usize) -> bool {
        self.get(branch, offset).is_some()
    }

    /// Replaces `length` children of `branch` starting at `offset` by the
    /// single node `node`.
    ///
    /// `offset` may equal the child count, and the removed range may reach
    /// one past the end; it is clamped. Removed children are detached.
    ///
    /// # Errors
    ///
    /// Fails before parsing starts, on a non-branch target, or when the
    /// range does not fit.
    pub fn replace(
        &mut self,
        branch: NodeId,
        offset: usize,
        length: usize,
        node: NodeId,
    ) -> Result<(), InvariantViolation> {
        if self.phase != Phase::Parsing {
            return Err(InvariantViolation::WrongPhase {
                operation: "replace",
                actual: self.phase,
            });
        }
        let kind = self.kind(branch);
        let len = self.len(branch);
        if !self.is_branch(branch) {
            return Err(InvariantViolation::NotABranch(kind));
        }
        if offset > len || offset + length > len + 1 {
            return Err(InvariantViolation::OutOfRange {
                offset,
                length,
                len,
            });
        }

        let end = (offset + length).min(len);
        let removed: Vec<NodeId> = match self.slots[branch.0].node.branch_children_mut() {
            Some(children) => children.splice(offset..end, [node]).collect(),
            None => return Err(InvariantViolation::NotABranch(kind)),
        };
        for id in &removed {
            if self.slots[id.0].parent == Some(branch) {
                self.slots[id.0].parent = None;
            }
        }
        self.slots[node.0].parent = Some(branch);
        self.invalidate(branch);

        trace!(
            branch = %branch,
            offset,
            removed = removed.len(),
            node = %self.kind(node),
            "Replaced children"
        );
        Ok(())
    }

    /// Swaps `old` for `new` wherever `old`'s parent refers to it.
    pub(crate) fn substitute(&mut self, old: NodeId, new: NodeId) -> Result<(), InvariantViolation> {
        let parent = self
            .parent(old)
            .ok_or_else(|| InvariantViolation::Detached(self.kind(old)))?;

        let offset = self
            .node(parent)
            .branch_children()
            .and_then(|children| children.iter().position(|&child| child == old));
        if let Some(offset) = offset {
            return self.replace(parent, offset, 1, new);
        }

        if self.phase != Phase::Parsing {
            return Err(InvariantViolation::WrongPhase {
                operation: "substitute",
                actual: self.phase,
            });
        }
        let mut found = false;
        for slot in self.slots[parent.0].node.child_slots_mut() {
            if *slot == old {
                *slot = new;
                found = true;
            }
        }
        if !found {
            return Err(InvariantViolation::Detached(self.kind(old)));
        }
        self.slots[old.0].parent = None;
        self.slots[new.0].parent = Some(parent);
        self.invalidate(parent);
        Ok(())
    }

    /// Copies a subtree into fresh, detached arena slots.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let mut node = self.node(id).clone();
        for slot in node.child_slots_mut() {
            *slot = self.clone_subtree(*slot);
        }
        self.insert(node)
    }

    /// Returns the structural hash of a node.
    ///
    /// The hash covers the node kind, every token's kind and lexeme, and
    /// the hashes of all sub-nodes. Token positions are ignored, so equal
    /// SQL fragments hash equally wherever they appear.
    #[must_use]
    pub fn hash(&self, id: NodeId) -> u64 {
        let slot = &self.slots[id.0];
        if let Some(hash) = slot.hash.get() {
            return hash;
        }

        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(slot.node.kind().name().as_bytes());
        for part in slot.node.parts() {
            match part {
                Part::Token(token) => {
                    buf.push(b'T');
                    buf.extend_from_slice(token.kind.name().as_bytes());
                    buf.push(0);
                    buf.extend_from_slice(&(token.lexeme.len() as u64).to_le_bytes());
                    buf.extend_from_slice(token.lexeme.as_bytes());
                }
                Part::Child(child) => {
                    buf.push(b'N');
                    buf.extend_from_slice(&self.hash(child).to_le_bytes());
                }
                Part::Absent => buf.push(b'-'),
                Part::Mark(mark) => {
                    buf.push(b'|');
                    buf.push(mark);
                }
            }
        }

        let hash = xxh3_64(&buf);
        slot.hash.set(Some(hash));
        hash
    }

    fn invalidate(&self, id: NodeId) {
        self.slots[id.0].hash.set(None);
        for ancestor in self.ancestors(id) {
            self.slots[ancestor.0].hash.set(None);
        }
    }

    /// Returns the position of the first token under a node.
    ///
    /// Nodes without any token report `0,0`.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Position {
        self.first_token(id)
            .map_or_else(Position::default, Token::position)
    }

    fn first_token(&self, id: NodeId) -> Option<&Token> {
        self.node(id).parts().into_iter().find_map(|part| match part {
            Part::Token(token) => Some(token),
            Part::Child(child) => self.first_token(child),
            Part::Absent | Part::Mark(_) => None,
        })
    }

    /// Builds a parsing error located at a node.
    #[must_use]
    pub fn error_at(&self, id: NodeId, message: impl Into<String>) -> ParsingError {
        let position = self.position(id);
        ParsingError::new(message, self.sql(), position.line, position.column)
    }

    /// Returns the root's children without `;` separators.
    #[must_use]
    pub fn statements(&self) -> Vec<NodeId> {
        self.node(ROOT)
            .branch_children()
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&id| self.token_kind(id) != Some(TokenKind::Semicolon))
            .collect()
    }

    /// Visits a subtree depth-first, parents before children.
    ///
    /// The callback receives the tree, the node and its depth below `id`.
    pub fn walk<F>(&self, id: NodeId, visit: &mut F)
    where
        F: FnMut(&Self, NodeId, usize),
    {
        self.walk_at(id, 0, visit);
    }

    fn walk_at<F>(&self, id: NodeId, depth: usize, visit: &mut F)
    where
        F: FnMut(&Self, NodeId, usize),
    {
        visit(self, id, depth);
        for child in self.children(id) {
            self.walk_at(child, depth + 1, visit);
        }
    }
}
