//! Core parser infrastructure: token cursor, error reporting, helpers.

use robolang_lexer::token::{Token, TokenKind};
use robolang_types::ast::{Block, BlockId, Ident, Program};
use robolang_types::{ErrorCode, ParseErrors, RoboError, SourceFile, Span};

/// The robolang parser.
///
/// Recursive descent with one token of lookahead. Collects errors and
/// resumes at the next statement boundary, so one malformed input can
/// report several independent problems.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    errors: ParseErrors,
    /// Block arena of the program being built.
    blocks: Vec<Block>,
}

/// Result of parsing.
///
/// `program` is `Some` exactly when `errors` is empty.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Option<Program>,
    pub errors: ParseErrors,
}

impl ParseResult {
    /// Convert into a `Result`, keeping the program only on a clean parse.
    pub fn into_result(self) -> Result<Program, ParseErrors> {
        match self.program {
            Some(program) if !self.errors.has_errors() => Ok(program),
            _ => Err(self.errors),
        }
    }
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(mut tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span).unwrap_or(Span::point(1, 1, 0));
            tokens.push(Token::new(TokenKind::Eof, end));
        }
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: ParseErrors::empty(),
            blocks: Vec::new(),
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span,
            None => Span::point(1, 1, 0),
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect the condition name after `se` / `enquanto`.
    pub(crate) fn expect_condition(&mut self, keyword: &str) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            other => {
                let span = self.current_span();
                self.error_with_suggestion(
                    ErrorCode::MISSING_CONDITION,
                    format!("expected a condition name after '{keyword}', found '{other}'"),
                    span,
                    format!("write '{keyword} sensor {{ ... }}'"),
                );
                None
            }
        }
    }

    // ── Arena ─────────────────────────────────────────────────────────────────

    pub(crate) fn alloc_block(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(block);
        id
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let error = self.build_error(code, message, span);
        self.errors.push_error(error);
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let error = self.build_error(code, message, span).with_suggestion(suggestion);
        self.errors.push_error(error);
    }

    fn build_error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> RoboError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        RoboError::new(&self.source_file.name, code, message, span, source_line)
    }

    /// Returns `true` if we've hit the error limit and should stop.
    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.is_full()
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip tokens until one that can start a statement, a `}` or EOF.
    /// Used after an error to resume at a known-good position.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_end() {
            let kind = self.peek_kind();
            if kind.starts_statement() || *kind == TokenKind::RBrace {
                return;
            }
            self.advance();
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a [`Program`].
    pub fn parse(mut self) -> ParseResult {
        let start = self.current_span();
        let stmts = self.parse_statements();
        let span = start.merge(self.previous_span());
        let root = self.alloc_block(Block { stmts, span });

        let Parser { blocks, errors, .. } = self;
        let program = if errors.has_errors() {
            None
        } else {
            Some(Program { blocks, root })
        };
        ParseResult { program, errors }
    }
}
