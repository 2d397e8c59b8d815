//! Shared types for the pils interpreter.
//!
//! This crate defines the source spans, runtime values, AST node types and
//! front-end error types used across the lexer, parser and evaluator.

mod error;
mod span;
mod value;
pub mod ast;

pub use error::{ErrorCode, LexError, LexErrorKind, ParseError};
pub use span::Span;
pub use value::Value;

/// Result type used by the lexer and parser.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;
