//! robolang parser: converts a token stream into an AST.

mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser};

use robolang_lexer::Lexer;
use robolang_types::SourceFile;

/// Lex and parse `source` in one call.
pub fn parse_source(name: &str, source: &str) -> ParseResult {
    let sf = SourceFile::new(name, source);
    let tokens = Lexer::new(&sf).lex();
    Parser::new(tokens, &sf).parse()
}
