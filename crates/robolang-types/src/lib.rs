//! Shared types for robolang.
//!
//! This crate defines the AST, source spans and the parse error model
//! used by the lexer, parser and evaluator crates.

mod error;
mod span;
pub mod ast;

pub use error::{ErrorCode, ParseErrors, RoboError, MAX_ERRORS};
pub use span::{SourceFile, Span};
