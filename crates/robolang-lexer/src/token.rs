//! Token types for the robolang lexer.
//!
//! Defines [`TokenKind`] covering every lexeme in robolang and
//! [`Token`], which pairs a kind with a source [`Span`].

use robolang_types::Span;
use std::fmt;

/// The reserved words of robolang.
///
/// Any other letter run is either a condition name (right after `se` or
/// `enquanto`) or a sequence of single-letter actions.
pub const ALL_KEYWORDS: &[&str] = &["se", "senao", "enquanto"];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the robolang lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in robolang.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A single letter instruction: `R`, `L`, `F`
    ActionLetter(char),
    /// Repeat count: `3`
    Integer(u32),
    /// Condition name following `se` / `enquanto`: `sensor`
    Identifier(String),

    /// `se`
    Se,
    /// `senao`
    Senao,
    /// `enquanto`
    Enquanto,

    /// `{`
    LBrace,
    /// `}`
    RBrace,

    /// Anything the grammar has no use for: stray punctuation, or an integer
    /// literal too large for a repeat count. The parser reports it.
    Invalid(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Look up a reserved word. Returns `None` for non-keywords.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "se" => TokenKind::Se,
            "senao" => TokenKind::Senao,
            "enquanto" => TokenKind::Enquanto,
            _ => return None,
        })
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Se | TokenKind::Senao | TokenKind::Enquanto)
    }

    /// Returns `true` if a statement can begin with this token.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::ActionLetter(_)
                | TokenKind::Integer(_)
                | TokenKind::Se
                | TokenKind::Enquanto
                | TokenKind::LBrace
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::ActionLetter(c) => write!(f, "{c}"),
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::Se => f.write_str("se"),
            TokenKind::Senao => f.write_str("senao"),
            TokenKind::Enquanto => f.write_str("enquanto"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Invalid(s) => f.write_str(s),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}
