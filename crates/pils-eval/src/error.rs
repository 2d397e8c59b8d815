//! Runtime error types for the pils evaluator, plus the aggregate error a
//! whole line can fail with.

use pils_types::{ErrorCode, LexError, ParseError};
use thiserror::Error;

use crate::builtins::Arity;

/// Evaluation error. Runtime errors carry no location: they describe a
/// value, not a token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Identifier not bound in the environment
    #[error("undefined name '{0}'")]
    UndefinedName(String),
    /// Binary operator applied to operands it does not support
    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    /// Unary operator applied to an operand it does not support
    #[error("cannot apply '{op}' to {operand}")]
    OperandMismatch {
        op: &'static str,
        operand: &'static str,
    },
    /// `/` or `%` with a zero divisor
    #[error("division by zero")]
    DivideByZero,
    /// Integer overflow or a non-finite float result
    #[error("numeric overflow in '{0}'")]
    Overflow(String),
    /// Call to a name that is not in the built-in table
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("'{name}' expects {expected}, got {found}")]
    WrongArgCount {
        name: String,
        expected: Arity,
        found: usize,
    },
    /// Built-in rejected an argument's type or value
    #[error("invalid argument to '{name}': {message}")]
    InvalidArgument { name: String, message: String },
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UndefinedName(_) => ErrorCode::UNDEFINED_NAME,
            Self::TypeMismatch { .. } | Self::OperandMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            Self::DivideByZero => ErrorCode::DIVIDE_BY_ZERO,
            Self::Overflow(_) => ErrorCode::OVERFLOW,
            Self::UnknownFunction(_) => ErrorCode::UNKNOWN_FUNCTION,
            Self::WrongArgCount { .. } => ErrorCode::WRONG_ARG_COUNT,
            Self::InvalidArgument { .. } => ErrorCode::INVALID_ARGUMENT,
        }
    }

    pub(crate) fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Any failure while processing one line: lexing, parsing or evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Lex(e) => e.code(),
            Self::Parse(e) => e.code,
            Self::Eval(e) => e.code(),
        }
    }

    /// Byte offset into the line, for errors that have one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Lex(e) => Some(e.offset()),
            Self::Parse(e) => Some(e.offset()),
            Self::Eval(_) => None,
        }
    }

    /// Render the error as the single line shown to the user:
    ///
    /// ```text
    /// Error [E201] at column 5: expected ')', found end of input
    /// Error [E300]: undefined name 'x'
    /// ```
    pub fn render(&self) -> String {
        match self.offset() {
            Some(offset) => format!("Error [{}] at column {}: {self}", self.code(), offset + 1),
            None => format!("Error [{}]: {self}", self.code()),
        }
    }
}
