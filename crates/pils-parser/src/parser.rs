//! Core parser infrastructure: token cursor, error reporting, helpers.

use pils_lexer::token::{Token, TokenKind};
use pils_types::ast::{Ident, Stmt};
use pils_types::{ErrorCode, ParseError, Result, Span};

/// Maximum nesting of groups, list literals, call arguments and unary
/// operators in one statement.
pub const MAX_NESTING_DEPTH: u32 = 64;

/// Maximum number of binary operators in one statement. A left-associative
/// chain nests one level per operator, so this bounds the AST depth of
/// `1 + 1 + ...` the way [`MAX_NESTING_DEPTH`] bounds brackets.
pub const MAX_BINARY_OPERATORS: u32 = 256;

/// Parse a token stream (as produced by the lexer) into one statement.
pub fn parse(tokens: Vec<Token>) -> Result<Stmt> {
    Parser::new(tokens).parse()
}

/// The pils parser.
///
/// Consumes a token stream produced by the lexer and builds the AST of
/// exactly one statement. Stops at the first error.
pub struct Parser {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Current nesting depth (max [`MAX_NESTING_DEPTH`]).
    pub(crate) depth: u32,
    /// Binary operators folded so far (max [`MAX_BINARY_OPERATORS`]).
    operators: u32,
}

impl Parser {
    /// Create a new parser from a token stream.
    ///
    /// A stream that does not end in `Eof` gets one appended, so the cursor
    /// can never run past the end.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::new(TokenKind::Eof, "", Span::point(end)));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
            operators: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        // `new` guarantees a trailing Eof, and `advance` never moves past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(0)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
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

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a closing delimiter. Reports an unclosed group if it is missing.
    pub(crate) fn expect_closing(&mut self, expected: &TokenKind) -> Result<Token> {
        if self.check_exact(expected) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(ErrorCode::UNCLOSED_GROUP, format!("'{expected}'")))
        }
    }

    /// Expect an identifier token. Returns the name and span.
    pub(crate) fn expect_identifier(&mut self) -> Result<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Ok(Ident::new(name, span))
            }
            _ => Err(self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "identifier")),
        }
    }

    /// Run `f` one nesting level deeper, failing once the limit is exceeded.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("at most {MAX_NESTING_DEPTH} levels of nesting"),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Account for one more binary operator at the current token.
    pub(crate) fn count_operator(&mut self) -> Result<()> {
        if self.operators >= MAX_BINARY_OPERATORS {
            return Err(self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("at most {MAX_BINARY_OPERATORS} binary operators"),
            ));
        }
        self.operators += 1;
        Ok(())
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Describe a token the way it appears in "found ..." messages.
    pub(crate) fn describe(token: &Token) -> String {
        match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", token.text),
        }
    }

    /// Build an error at the current token position.
    ///
    /// Running into `Eof` where something else was expected is always
    /// reported as premature end of input, unless the caller is waiting for
    /// a closing delimiter.
    pub(crate) fn error_at_current(
        &self,
        code: ErrorCode,
        expected: impl Into<String>,
    ) -> ParseError {
        let token = self.peek();
        let code = if self.at_end() && code == ErrorCode::UNEXPECTED_TOKEN {
            ErrorCode::UNEXPECTED_END
        } else {
            code
        };
        ParseError::new(code, token.span, expected, Self::describe(token))
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into exactly one statement.
    ///
    /// Anything left after a complete statement is an error, so `1 + 2 3` is
    /// rejected rather than silently truncated.
    pub fn parse(mut self) -> Result<Stmt> {
        let stmt = self.parse_statement()?;
        if !self.at_end() {
            return Err(self.error_at_current(ErrorCode::TRAILING_INPUT, "end of input"));
        }
        Ok(stmt)
    }
}
