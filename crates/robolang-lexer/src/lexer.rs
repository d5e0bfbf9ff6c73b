//! Core robolang lexer: converts source text to a token stream.
//!
//! The lexer never fails. Characters the grammar has no use for come out as
//! [`TokenKind::Invalid`] and the parser owns every error message.
//!
//! Letter runs are classified in this order:
//! 1. a whole run equal to a reserved word is that keyword;
//! 2. a run directly after `se` / `enquanto` is a condition identifier;
//! 3. otherwise a single letter is an action and scanning resumes after it,
//!    so `LLRL` is four actions.

use robolang_types::{SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The robolang lexer.
pub struct Lexer<'src> {
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
    /// Set right after `se` / `enquanto`: the next letter run is a name.
    expect_identifier: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self::from_source(&source_file.source)
    }

    /// Create a lexer over bare source text.
    pub fn from_source(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
            expect_identifier: false,
        }
    }

    /// Lex the entire source into a token stream ending with [`TokenKind::Eof`].
    pub fn lex(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            self.expect_identifier = matches!(token.kind, TokenKind::Se | TokenKind::Enquanto);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn advance_by(&mut self, chars: usize) {
        for _ in 0..chars {
            self.advance();
        }
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col, self.pos)
    }

    fn span_from(&self, start: Span) -> Span {
        Span::new(
            start.start_line,
            start.start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
            start.offset,
        )
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// The maximal run of identifier characters at the cursor, not consumed.
    fn peek_word(&self) -> &'src str {
        let source: &'src str = self.source;
        let rest = &source[self.pos..];
        let end = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_char(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.current_span();

        let Some(ch) = self.peek() else {
            return Token::new(TokenKind::Eof, start);
        };

        match ch {
            '{' => {
                self.advance();
                Token::new(TokenKind::LBrace, self.span_from(start))
            }
            '}' => {
                self.advance();
                Token::new(TokenKind::RBrace, self.span_from(start))
            }
            '0'..='9' => self.scan_integer(start),
            c if c.is_alphabetic() => self.scan_word(start),
            c => {
                self.advance();
                Token::new(TokenKind::Invalid(c.to_string()), self.span_from(start))
            }
        }
    }

    fn scan_integer(&mut self, start: Span) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let text = &self.source[start.offset..self.pos];
        let kind = match text.parse::<u32>() {
            Ok(n) => TokenKind::Integer(n),
            Err(_) => TokenKind::Invalid(text.to_string()),
        };
        Token::new(kind, self.span_from(start))
    }

    fn scan_word(&mut self, start: Span) -> Token {
        let word = self.peek_word();

        if let Some(keyword) = TokenKind::from_keyword(word) {
            self.advance_by(word.chars().count());
            return Token::new(keyword, self.span_from(start));
        }

        if self.expect_identifier {
            self.advance_by(word.chars().count());
            return Token::new(TokenKind::Identifier(word.to_string()), self.span_from(start));
        }

        // `scan_token` only dispatches here on an alphabetic character.
        let kind = match self.advance() {
            Some(letter) => TokenKind::ActionLetter(letter),
            None => TokenKind::Eof,
        };
        Token::new(kind, self.span_from(start))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
