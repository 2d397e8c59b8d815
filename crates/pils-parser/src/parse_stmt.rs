//! Statement parsing: blank lines, assignments, bare expressions.

use pils_lexer::token::TokenKind;
use pils_types::ast::{Stmt, StmtKind};
use pils_types::Result;

use crate::parser::Parser;

impl Parser {
    /// `Statement = [ Identifier "=" ] Expression | <empty>`
    ///
    /// Assignment is recognised only by the leading `identifier =` pair, so
    /// an `=` anywhere else is left for the caller to reject.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt> {
        if self.at_end() {
            return Ok(Stmt::new(StmtKind::Empty, self.current_span()));
        }

        if matches!(self.peek_kind(), TokenKind::Identifier(_))
            && *self.look_ahead(1) == TokenKind::Eq
        {
            let name = self.expect_identifier()?;
            self.advance(); // eat `=`
            let value = self.parse_expression()?;
            let span = name.span.merge(value.span);
            return Ok(Stmt::new(StmtKind::Assign { name, value }, span));
        }

        let expr = self.parse_expression()?;
        let span = expr.span;
        Ok(Stmt::new(StmtKind::Expr(expr), span))
    }
}
