//! Core pils lexer: converts one line of source text to a token stream.
//!
//! Features:
//! - Integer and decimal literals (`42`, `3.14`)
//! - String literals with `\" \\ \n \t` escapes
//! - One- and two-character operators, longest match first
//! - Keywords `true`, `false`, `not`
//! - Stops at the first invalid character and reports its byte offset

use pils_types::{LexError, LexErrorKind, Span};

use crate::token::{Token, TokenKind};

/// Lex a whole line. Shorthand for `Lexer::new(line).lex()`.
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(line).lex()
}

/// The pils lexer.
///
/// Every call to [`Lexer::next_token`] consumes at least one character or
/// returns `Eof`, so lexing a finite line always terminates.
pub struct Lexer<'src> {
    /// The line being scanned.
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over one line of input.
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// Lex the entire line into a token stream ending in exactly one
    /// [`TokenKind::Eof`].
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.pos)
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.source[start..self.pos], self.span_from(start))
    }

    fn error_from(&self, kind: LexErrorKind, start: usize) -> LexError {
        LexError::new(kind, self.span_from(start))
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if matches!(ch, ' ' | '\t' | '\r' | '\n') {
                self.advance();
            } else {
                break;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, "", Span::point(start)));
        };

        let kind = match ch {
            // ── Literals ──
            '"' => return self.scan_string(start),
            '0'..='9' => return self.scan_number(start),

            // ── Identifiers & keywords ──
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.scan_identifier(start)),

            // ── Operators ──
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => self.two_char('=', TokenKind::EqEq, TokenKind::Eq),
            '<' => self.two_char('=', TokenKind::LessEq, TokenKind::Less),
            '>' => self.two_char('=', TokenKind::GreaterEq, TokenKind::Greater),
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::BangEq
            }

            // ── Punctuation ──
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,

            other => {
                return Err(self.error_from(LexErrorKind::UnexpectedChar(other), start));
            }
        };

        Ok(self.token_from(kind, start))
    }

    /// Pick the two-character operator if `second` follows, else the single one.
    fn two_char(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start: usize) -> Result<Token, LexError> {
        // We already consumed the first digit
        while let Some('0'..='9') = self.peek() {
            self.advance();
        }

        // A decimal point only belongs to the number when a digit follows it
        let mut is_float = false;
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some('0'..='9')) {
            is_float = true;
            self.advance(); // consume '.'
            while let Some('0'..='9') = self.peek() {
                self.advance();
            }
        }

        let text = &self.source[start..self.pos];
        let kind = if is_float {
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => TokenKind::Float(n),
                _ => {
                    return Err(self.error_from(
                        LexErrorKind::NumberOutOfRange(text.to_string()),
                        start,
                    ))
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => TokenKind::Int(n),
                Err(_) => {
                    return Err(self.error_from(
                        LexErrorKind::NumberOutOfRange(text.to_string()),
                        start,
                    ))
                }
            }
        };

        Ok(self.token_from(kind, start))
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start: usize) -> Token {
        // First character was already consumed (letter or `_`)
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.pos];
        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        self.token_from(kind, start)
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal starting after the opening `"`.
    fn scan_string(&mut self, start: usize) -> Result<Token, LexError> {
        let mut buf = String::new();

        loop {
            match self.advance() {
                None => {
                    return Err(self.error_from(LexErrorKind::UnterminatedString, start));
                }
                Some('"') => {
                    return Ok(self.token_from(TokenKind::Str(buf), start));
                }
                Some('\\') => {
                    let escape_start = self.pos - 1;
                    match self.advance() {
                        Some('"') => buf.push('"'),
                        Some('\\') => buf.push('\\'),
                        Some('n') => buf.push('\n'),
                        Some('t') => buf.push('\t'),
                        Some(other) => {
                            return Err(self.error_from(
                                LexErrorKind::InvalidEscape(other),
                                escape_start,
                            ));
                        }
                        None => {
                            return Err(self.error_from(LexErrorKind::UnterminatedString, start));
                        }
                    }
                }
                Some(ch) => buf.push(ch),
            }
        }
    }
}
