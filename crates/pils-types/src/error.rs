use crate::Span;
use std::fmt;
use thiserror::Error;

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical errors (E100–E199) ──
    pub const UNEXPECTED_CHARACTER: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);
    pub const INVALID_ESCAPE: Self = Self(102);
    pub const NUMBER_OUT_OF_RANGE: Self = Self(103);

    // ── Syntax errors (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const UNCLOSED_GROUP: Self = Self(201);
    pub const TRAILING_INPUT: Self = Self(202);
    pub const UNEXPECTED_END: Self = Self(203);
    pub const NESTING_TOO_DEEP: Self = Self(204);

    // ── Runtime errors (E300–E399) ──
    pub const UNDEFINED_NAME: Self = Self(300);
    pub const TYPE_MISMATCH: Self = Self(301);
    pub const DIVIDE_BY_ZERO: Self = Self(302);
    pub const OVERFLOW: Self = Self(303);
    pub const UNKNOWN_FUNCTION: Self = Self(304);
    pub const WRONG_ARG_COUNT: Self = Self(305);
    pub const INVALID_ARGUMENT: Self = Self(306);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Lexer errors
// ─────────────────────────────────────────────────────────────────────

/// What went wrong while scanning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("number literal '{0}' is out of range")]
    NumberOutOfRange(String),
}

/// A located lexer failure. The lexer stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Byte offset of the offending input.
    pub fn offset(&self) -> usize {
        self.span.start
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnexpectedChar(_) => ErrorCode::UNEXPECTED_CHARACTER,
            LexErrorKind::UnterminatedString => ErrorCode::UNTERMINATED_STRING,
            LexErrorKind::InvalidEscape(_) => ErrorCode::INVALID_ESCAPE,
            LexErrorKind::NumberOutOfRange(_) => ErrorCode::NUMBER_OUT_OF_RANGE,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Parser errors
// ─────────────────────────────────────────────────────────────────────

/// A located parser failure: what the grammar expected and what it found.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub span: Span,
    /// Human-readable description of what would have been accepted.
    pub expected: String,
    /// Human-readable description of the offending token.
    pub found: String,
}

impl ParseError {
    pub fn new(
        code: ErrorCode,
        span: Span,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self {
            code,
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Byte offset of the offending token.
    pub fn offset(&self) -> usize {
        self.span.start
    }
}
