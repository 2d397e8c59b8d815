//! pils parser: converts a token stream into the AST of one statement.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{parse, Parser, MAX_BINARY_OPERATORS, MAX_NESTING_DEPTH};
