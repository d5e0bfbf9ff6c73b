//! AST node types for robolang.
//!
//! Blocks live in an arena owned by [`Program`] and are addressed by
//! [`BlockId`]. Each id is referenced by exactly one statement (or is the
//! root), so the program stays tree-shaped, while the evaluator can name a
//! block with a plain index instead of a borrow.

use crate::Span;
use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// Index of a [`Block`] inside [`Program::blocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A parsed robolang program.
///
/// Immutable after a successful parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Block arena. `root` holds the top-level statements.
    pub blocks: Vec<Block>,
    pub root: BlockId,
}

impl Program {
    /// Look up a block by id.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// The top-level block.
    pub fn root_block(&self) -> Option<&Block> {
        self.block(self.root)
    }

    /// Total number of action statements in the program text
    /// (not the number executed, which depends on repeats and conditions).
    pub fn action_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| b.stmts.iter())
            .filter(|s| matches!(s, Stmt::Action(_)))
            .count()
    }
}

/// An ordered sequence of statements, `{ ... }` or the program top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier (scope variable name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A robolang statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `R`: one observable action.
    Action(ActionStmt),
    /// `{ ... }` used as a statement.
    Block(BlockId),
    /// `3{ ... }`
    Repeat(RepeatStmt),
    /// `se cond { ... } senao { ... }`
    Conditional(ConditionalStmt),
    /// `enquanto cond { ... }`
    Loop(LoopStmt),
}

impl Stmt {
    pub fn span(&self, program: &Program) -> Option<Span> {
        match self {
            Stmt::Action(a) => Some(a.span),
            Stmt::Block(id) => program.block(*id).map(|b| b.span),
            Stmt::Repeat(r) => Some(r.span),
            Stmt::Conditional(c) => Some(c.span),
            Stmt::Loop(l) => Some(l.span),
        }
    }
}

/// A single-letter action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStmt {
    pub letter: char,
    pub span: Span,
}

/// `count{ body }` runs `body` exactly `count` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatStmt {
    pub count: u32,
    pub body: BlockId,
    pub span: Span,
}

/// `se condition { then_block } senao { else_block }`
///
/// The condition is read once, when the statement is entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalStmt {
    pub condition: Ident,
    pub then_block: BlockId,
    pub else_block: Option<BlockId>,
    pub span: Span,
}

/// `enquanto condition { body }`
///
/// The condition is re-read before every iteration, including the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStmt {
    pub condition: Ident,
    pub body: BlockId,
    pub span: Span,
}
