//! Expression parsing with operator precedence.
//!
//! Precedence (lowest → highest):
//! 4. `==`, `!=`, `<`, `>`, `<=`, `>=` (no chaining)
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `-`, `not`

use pils_lexer::token::TokenKind;
use pils_types::ast::*;
use pils_types::{ErrorCode, Result, Value};

use crate::parser::Parser;

impl Parser {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_comparison()
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `CompExpr = AddExpr [ CompOp AddExpr ]`
    ///
    /// Comparison operators do NOT chain: in `a < b < c` the second `<` is
    /// left unconsumed and rejected as trailing input.
    fn parse_comparison(&mut self) -> Result<Expr> {
        let left = self.parse_add()?;
        let Some(op) = self.match_comparison_op() else {
            return Ok(left);
        };
        self.count_operator()?;
        self.advance(); // consume operator
        let right = self.parse_add()?;
        let span = left.span.merge(right.span);
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    /// Check if current token is a comparison operator, return corresponding BinOp.
    fn match_comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::NotEq),
            TokenKind::Less => Some(BinOp::Less),
            TokenKind::Greater => Some(BinOp::Greater),
            TokenKind::LessEq => Some(BinOp::LessEq),
            TokenKind::GreaterEq => Some(BinOp::GreaterEq),
            _ => None,
        }
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Result<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.count_operator()?;
            self.advance();
            let right = self.parse_mul()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/" | "%") UnaryExpr }`
    fn parse_mul(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.count_operator()?;
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    /// `UnaryExpr = ( "-" | "not" ) UnaryExpr | PrimaryExpr`
    fn parse_unary(&mut self) -> Result<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.nested(|p| p.parse_unary())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a primary expression.
    fn parse_primary(&mut self) -> Result<Expr> {
        let start = self.current_span();
        let literal = match self.peek_kind().clone() {
            // ── Literals ────────────────────────────────────────────────
            TokenKind::Int(n) => Value::Int(n),
            TokenKind::Float(n) => Value::Float(n),
            TokenKind::Str(s) => Value::Text(s),
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),

            // ── Grouping ────────────────────────────────────────────────
            TokenKind::LParen => {
                self.advance(); // eat `(`
                let inner = self.nested(|p| p.parse_expression())?;
                self.expect_closing(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                return Ok(Expr::new(ExprKind::Paren(Box::new(inner)), span));
            }

            // ── Collections ─────────────────────────────────────────────
            TokenKind::LBracket => {
                self.advance(); // eat `[`
                let items = self.parse_arg_list(&TokenKind::RBracket)?;
                let span = start.merge(self.previous_span());
                return Ok(Expr::new(ExprKind::List(items), span));
            }

            // ── Identifier or built-in call ─────────────────────────────
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier()?;
                if !self.eat(&TokenKind::LParen) {
                    return Ok(Expr::new(ExprKind::Identifier(name.name), name.span));
                }
                let args = self.parse_arg_list(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                return Ok(Expr::new(ExprKind::Call { name, args }, span));
            }

            _ => {
                return Err(self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "expression"));
            }
        };
        self.advance();
        Ok(Expr::new(ExprKind::Literal(literal), start))
    }

    /// Parse a comma-separated list of expressions up to and including the
    /// `close` delimiter. The opening delimiter is already consumed.
    /// A trailing comma is allowed.
    fn parse_arg_list(&mut self, close: &TokenKind) -> Result<Vec<Expr>> {
        self.nested(|p| {
            let mut args = Vec::new();
            while !p.check_exact(close) {
                if p.at_end() {
                    return Err(p.error_at_current(ErrorCode::UNCLOSED_GROUP, format!("'{close}'")));
                }
                args.push(p.parse_expression()?);
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect_closing(close)?;
            Ok(args)
        })
    }
}
