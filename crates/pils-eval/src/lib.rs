//! pils tree-walking evaluator.
//!
//! Evaluates one parsed statement at a time against a persistent
//! [`Environment`]. [`Session`] bundles the environment with the full
//! lex → parse → evaluate pipeline and the two serialized views of the
//! environment; it is what the browser boundary and the REPL drive.

mod builtins;
mod env;
mod error;
mod evaluator;
pub mod help;
mod session;

pub use builtins::{Arity, Builtin, BuiltinFn, BuiltinRegistry, BUILTINS};
pub use env::{Environment, CONSTANTS};
pub use error::{Error, EvalError, EvalResult};
pub use evaluator::{evaluate, values_equal, Evaluator};
pub use pils_types::Value;
pub use session::{example_environment, Session, EXAMPLE_SCRIPT};
