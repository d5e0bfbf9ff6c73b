//! Statement and block parsing.
//!
//! ```text
//! statement   := action | repeat | conditional | loop | block
//! action      := ACTION_LETTER
//! repeat      := INTEGER block
//! conditional := "se" IDENTIFIER block ("senao" block)?
//! loop        := "enquanto" IDENTIFIER block
//! block       := "{" statement* "}"
//! ```
//!
//! Blocks are parsed with an explicit stack of open blocks instead of native
//! recursion, so nesting depth is limited by memory, not by the call stack.

use crate::parser::Parser;
use robolang_lexer::token::TokenKind;
use robolang_types::ast::*;
use robolang_types::{ErrorCode, Span};

/// The statement an open block becomes part of once its `}` is reached.
enum Pending {
    Bare,
    Repeat {
        count: u32,
        start: Span,
    },
    Then {
        condition: Ident,
        start: Span,
    },
    Else {
        condition: Ident,
        then_block: BlockId,
        start: Span,
    },
    Loop {
        condition: Ident,
        start: Span,
    },
}

/// A `{` whose `}` has not been seen yet.
struct OpenBlock {
    /// Span of the `{`.
    open: Span,
    stmts: Vec<Stmt>,
    pending: Pending,
}

/// Outcome of one parsing step.
enum Step {
    /// A complete statement for the innermost open block.
    Stmt(Stmt),
    /// A `{` was consumed; statements now go into this block.
    Open(OpenBlock),
    /// An error was reported; resynchronize.
    Failed,
}

impl<'src> Parser<'src> {
    /// Parse statements up to end of file and return the top-level ones.
    ///
    /// A `}` closes the innermost open block, or is reported as unmatched at
    /// the top level. Blocks still open at end of file are reported as
    /// unclosed, innermost first.
    pub(crate) fn parse_statements(&mut self) -> Vec<Stmt> {
        let mut root = Vec::new();
        let mut open: Vec<OpenBlock> = Vec::new();

        while !self.at_end() && !self.too_many_errors() {
            let step = if self.check_exact(&TokenKind::RBrace) {
                match open.pop() {
                    Some(block) => self.close_block(block),
                    None => {
                        let span = self.advance().span;
                        self.error_with_suggestion(
                            ErrorCode::UNMATCHED_CLOSE_BRACE,
                            "unmatched '}'",
                            span,
                            "remove it or add a matching '{' before it",
                        );
                        continue;
                    }
                }
            } else {
                self.parse_statement()
            };

            match step {
                Step::Stmt(stmt) => match open.last_mut() {
                    Some(block) => block.stmts.push(stmt),
                    None => root.push(stmt),
                },
                Step::Open(block) => open.push(block),
                Step::Failed => self.synchronize(),
            }
        }

        while let Some(block) = open.pop() {
            self.error_with_suggestion(
                ErrorCode::UNCLOSED_BRACE,
                "unclosed '{'",
                block.open,
                "add a matching '}'",
            );
        }
        root
    }

    /// Start a single statement at the current token.
    ///
    /// Every `Failed` path has consumed at least one token, so the caller
    /// always makes progress.
    fn parse_statement(&mut self) -> Step {
        match self.peek_kind().clone() {
            TokenKind::ActionLetter(letter) => {
                let span = self.advance().span;
                Step::Stmt(Stmt::Action(ActionStmt { letter, span }))
            }
            TokenKind::Integer(count) => {
                let start = self.advance().span;
                self.open_block(&format!("repeat count {count}"), Pending::Repeat { count, start })
            }
            TokenKind::Se => {
                let start = self.advance().span;
                let Some(condition) = self.expect_condition("se") else {
                    return Step::Failed;
                };
                let construct = format!("'se {}'", condition.name);
                self.open_block(&construct, Pending::Then { condition, start })
            }
            TokenKind::Enquanto => {
                let start = self.advance().span;
                let Some(condition) = self.expect_condition("enquanto") else {
                    return Step::Failed;
                };
                let construct = format!("'enquanto {}'", condition.name);
                self.open_block(&construct, Pending::Loop { condition, start })
            }
            TokenKind::LBrace => self.open_block("a block", Pending::Bare),
            TokenKind::Senao => {
                let span = self.advance().span;
                self.error_with_suggestion(
                    ErrorCode::ELSE_WITHOUT_IF,
                    "'senao' must directly follow the block of a 'se'",
                    span,
                    "write 'se sensor { ... } senao { ... }'",
                );
                Step::Failed
            }
            TokenKind::Invalid(text) => {
                let message = if text.chars().all(|c| c.is_ascii_digit()) {
                    format!("repeat count '{text}' is too large")
                } else {
                    format!("unexpected character '{text}'")
                };
                self.error_at_current(ErrorCode::INVALID_TOKEN, message);
                self.advance();
                Step::Failed
            }
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected a statement, found '{other}'"),
                );
                self.advance();
                Step::Failed
            }
        }
    }

    /// Consume the `{` required after `construct`, reporting E104 if the
    /// next token is something else.
    fn open_block(&mut self, construct: &str, pending: Pending) -> Step {
        if self.check_exact(&TokenKind::LBrace) {
            let open = self.advance().span;
            return Step::Open(OpenBlock {
                open,
                stmts: Vec::new(),
                pending,
            });
        }
        let found = self.peek_kind().clone();
        let span = self.current_span();
        self.error_with_suggestion(
            ErrorCode::MISSING_BLOCK,
            format!("expected '{{' after {construct}, found '{found}'"),
            span,
            format!("wrap the body of {construct} in '{{ ... }}'"),
        );
        Step::Failed
    }

    /// Consume the `}` of `block` and build the statement that owns it.
    ///
    /// The then-block of a `se` may be followed by `senao`, which opens
    /// another block instead of completing the statement.
    fn close_block(&mut self, block: OpenBlock) -> Step {
        let close = self.advance().span;
        let id = self.alloc_block(Block {
            stmts: block.stmts,
            span: block.open.merge(close),
        });

        match block.pending {
            Pending::Bare => Step::Stmt(Stmt::Block(id)),
            Pending::Repeat { count, start } => Step::Stmt(Stmt::Repeat(RepeatStmt {
                count,
                body: id,
                span: start.merge(close),
            })),
            Pending::Loop { condition, start } => Step::Stmt(Stmt::Loop(LoopStmt {
                condition,
                body: id,
                span: start.merge(close),
            })),
            Pending::Else {
                condition,
                then_block,
                start,
            } => Step::Stmt(Stmt::Conditional(ConditionalStmt {
                condition,
                then_block,
                else_block: Some(id),
                span: start.merge(close),
            })),
            Pending::Then { condition, start } => {
                if self.eat(&TokenKind::Senao) {
                    self.open_block(
                        "'senao'",
                        Pending::Else {
                            condition,
                            then_block: id,
                            start,
                        },
                    )
                } else {
                    Step::Stmt(Stmt::Conditional(ConditionalStmt {
                        condition,
                        then_block: id,
                        else_block: None,
                        span: start.merge(close),
                    }))
                }
            }
        }
    }
}
