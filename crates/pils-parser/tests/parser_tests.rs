//! Parser tests.
//!
//! Covers: statements (empty, expression, assignment), precedence and
//! associativity, unary operators, grouping, list literals, built-in calls,
//! every parse error class with its location, the nesting limit, and
//! determinism.

use pils_lexer::tokenize;
use pils_parser::{parse, MAX_BINARY_OPERATORS, MAX_NESTING_DEPTH};
use pils_types::ast::*;
use pils_types::{ErrorCode, ParseError, Span, Value};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex and parse a line.
fn parse_line(source: &str) -> Result<Stmt, ParseError> {
    let tokens = tokenize(source).unwrap_or_else(|e| panic!("lex error in {source:?}: {e}"));
    parse(tokens)
}

/// Parse a line and return the statement, panicking on errors.
fn parse_ok(source: &str) -> Stmt {
    parse_line(source).unwrap_or_else(|e| panic!("unexpected parse error in {source:?}: {e}"))
}

/// Parse a line and return the error, panicking on success.
fn parse_err(source: &str) -> ParseError {
    match parse_line(source) {
        Ok(stmt) => panic!("expected parse error for {source:?}, got {stmt:?}"),
        Err(e) => e,
    }
}

/// Parse a bare expression statement.
fn expr(source: &str) -> Expr {
    match parse_ok(source).kind {
        StmtKind::Expr(e) => e,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

/// Render an expression as a fully parenthesised string for shape checks.
fn sexp(e: &Expr) -> String {
    match &e.kind {
        ExprKind::Literal(v) => match v {
            Value::Text(s) => format!("{s:?}"),
            other => other.to_string(),
        },
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::List(items) => {
            let parts: Vec<String> = items.iter().map(sexp).collect();
            format!("[{}]", parts.join(" "))
        }
        ExprKind::Call { name, args } => {
            let parts: Vec<String> = args.iter().map(sexp).collect();
            format!("{}({})", name.name, parts.join(" "))
        }
        ExprKind::Binary { left, op, right } => {
            format!("({} {} {})", op.as_str(), sexp(left), sexp(right))
        }
        ExprKind::Unary { op, operand } => format!("({} {})", op.as_str(), sexp(operand)),
        ExprKind::Paren(inner) => sexp(inner),
    }
}

fn shape(source: &str) -> String {
    sexp(&expr(source))
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_line_is_empty_statement() {
    assert_eq!(parse_ok("").kind, StmtKind::Empty);
    assert_eq!(parse_ok("   ").kind, StmtKind::Empty);
}

#[test]
fn test_assignment() {
    let stmt = parse_ok("x = 3");
    match stmt.kind {
        StmtKind::Assign { name, value } => {
            assert_eq!(name.name, "x");
            assert_eq!(name.span, Span::new(0, 1));
            assert_eq!(value.kind, ExprKind::Literal(Value::Int(3)));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
    assert_eq!(stmt.span, Span::new(0, 5));
}

#[test]
fn test_assignment_rhs_is_full_expression() {
    match parse_ok("total = 2 + 3 * x").kind {
        StmtKind::Assign { name, value } => {
            assert_eq!(name.name, "total");
            assert_eq!(sexp(&value), "(+ 2 (* 3 x))");
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_comparison_is_not_assignment() {
    assert_eq!(shape("x == 3"), "(== x 3)");
}

#[test]
fn test_bare_identifier_statement() {
    assert_eq!(expr("doesNotExist").kind, ExprKind::Identifier("doesNotExist".into()));
}

// ─────────────────────────────────────────────────────────────────────
// Precedence & associativity
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_multiplicative_binds_tighter() {
    assert_eq!(shape("2 + 3 * 4"), "(+ 2 (* 3 4))");
    assert_eq!(shape("2 * 3 + 4"), "(+ (* 2 3) 4)");
    assert_eq!(shape("10 - 6 / 2 % 4"), "(- 10 (% (/ 6 2) 4))");
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(shape("(2 + 3) * 4"), "(* (+ 2 3) 4)");
    assert!(matches!(expr("(2 + 3) * 4").kind, ExprKind::Binary { .. }));
}

#[test]
fn test_left_associativity() {
    assert_eq!(shape("1 - 2 - 3"), "(- (- 1 2) 3)");
    assert_eq!(shape("8 / 4 / 2"), "(/ (/ 8 4) 2)");
}

#[test]
fn test_comparison_is_lowest() {
    assert_eq!(shape("1 + 2 < 3 * 4"), "(< (+ 1 2) (* 3 4))");
    assert_eq!(shape("a != b"), "(!= a b)");
    assert_eq!(shape("a >= -b"), "(>= a (- b))");
}

#[test]
fn test_unary_operators() {
    assert_eq!(shape("-x"), "(- x)");
    assert_eq!(shape("--x"), "(- (- x))");
    assert_eq!(shape("-2 * 3"), "(* (- 2) 3)");
    assert_eq!(shape("not true"), "(not true)");
    assert_eq!(shape("not a == b"), "(== (not a) b)");
}

// ─────────────────────────────────────────────────────────────────────
// Primaries
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_literals() {
    assert_eq!(expr("42").kind, ExprKind::Literal(Value::Int(42)));
    assert_eq!(expr("2.5").kind, ExprKind::Literal(Value::Float(2.5)));
    assert_eq!(expr("\"hi\"").kind, ExprKind::Literal(Value::Text("hi".into())));
    assert_eq!(expr("false").kind, ExprKind::Literal(Value::Bool(false)));
}

#[test]
fn test_list_literals() {
    assert_eq!(shape("[]"), "[]");
    assert_eq!(shape("[1, 2, 3]"), "[1 2 3]");
    assert_eq!(shape("[1, [2, 3],]"), "[1 [2 3]]");
    assert_eq!(shape("[1 + 2, \"a\"]"), "[(+ 1 2) \"a\"]");
}

#[test]
fn test_calls() {
    assert_eq!(shape("sqrt(16)"), "sqrt(16)");
    assert_eq!(shape("max(1, 2, x + 1)"), "max(1 2 (+ x 1))");
    assert_eq!(shape("list()"), "list()");
    assert_eq!(shape("head(tail([1, 2]))"), "head(tail([1 2]))");
}

#[test]
fn test_identifier_without_parens_is_not_call() {
    assert_eq!(expr("sqrt").kind, ExprKind::Identifier("sqrt".into()));
}

#[test]
fn test_expression_spans() {
    let e = expr("(1 + 2) * 30");
    assert_eq!(e.span, Span::new(0, 12));
    let e = expr("max(1, 2)");
    assert_eq!(e.span, Span::new(0, 9));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unexpected_token() {
    let err = parse_err("1 + )");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(err.offset(), 4);
    assert_eq!(err.expected, "expression");
    assert_eq!(err.found, "')'");
    assert_eq!(err.to_string(), "expected expression, found ')'");
}

#[test]
fn test_premature_end_of_input() {
    let err = parse_err("1 +");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_END);
    assert_eq!(err.offset(), 3);
    assert_eq!(err.to_string(), "expected expression, found end of input");

    assert_eq!(parse_err("x =").code, ErrorCode::UNEXPECTED_END);
    assert_eq!(parse_err("-").code, ErrorCode::UNEXPECTED_END);
}

#[test]
fn test_unmatched_open_paren() {
    let err = parse_err("(1 + 2");
    assert_eq!(err.code, ErrorCode::UNCLOSED_GROUP);
    assert_eq!(err.to_string(), "expected ')', found end of input");
    assert_eq!(parse_err("[1, 2").code, ErrorCode::UNCLOSED_GROUP);
    assert_eq!(parse_err("max(1, 2").code, ErrorCode::UNCLOSED_GROUP);
    assert_eq!(parse_err("max(1 2)").code, ErrorCode::UNCLOSED_GROUP);
}

#[test]
fn test_unmatched_close_paren_is_trailing_input() {
    let err = parse_err("1 + 2)");
    assert_eq!(err.code, ErrorCode::TRAILING_INPUT);
    assert_eq!(err.offset(), 5);
}

#[test]
fn test_trailing_tokens_are_rejected() {
    let err = parse_err("1 + 2 3");
    assert_eq!(err.code, ErrorCode::TRAILING_INPUT);
    assert_eq!(err.offset(), 6);
    assert_eq!(err.to_string(), "expected end of input, found '3'");
}

#[test]
fn test_comparisons_do_not_chain() {
    let err = parse_err("1 < 2 < 3");
    assert_eq!(err.code, ErrorCode::TRAILING_INPUT);
    assert_eq!(err.found, "'<'");
}

#[test]
fn test_assignment_only_at_top_level() {
    // Inside a group the `=` is not an assignment
    let err = parse_err("(x = 1)");
    assert_eq!(err.code, ErrorCode::UNCLOSED_GROUP);
    assert_eq!(err.found, "'='");

    // No chained assignment, no assignment to a non-name
    assert_eq!(parse_err("x = y = 3").code, ErrorCode::TRAILING_INPUT);
    assert_eq!(parse_err("1 = 2").code, ErrorCode::TRAILING_INPUT);
    assert_eq!(parse_err("x + 1 = 2").code, ErrorCode::TRAILING_INPUT);
}

#[test]
fn test_keyword_cannot_be_assigned() {
    let err = parse_err("true = 1");
    assert_eq!(err.code, ErrorCode::TRAILING_INPUT);
    assert_eq!(err.found, "'='");
}

#[test]
fn test_leading_comma_in_list() {
    let err = parse_err("[,]");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(err.found, "','");
}

// ─────────────────────────────────────────────────────────────────────
// Nesting limit
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_nesting_at_limit_is_accepted() {
    let depth = MAX_NESTING_DEPTH as usize;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(shape(&source), "1");
}

#[test]
fn test_nesting_beyond_limit_is_rejected() {
    let depth = MAX_NESTING_DEPTH as usize + 1;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse_err(&source).code, ErrorCode::NESTING_TOO_DEEP);

    let source = format!("{}1", "-".repeat(200));
    assert_eq!(parse_err(&source).code, ErrorCode::NESTING_TOO_DEEP);

    let source = format!("{}1{}", "[".repeat(200), "]".repeat(200));
    assert_eq!(parse_err(&source).code, ErrorCode::NESTING_TOO_DEEP);
}

/// `1+1+...+1` with `operators` plus signs.
fn sum_chain(operators: usize) -> String {
    vec!["1"; operators + 1].join("+")
}

#[test]
fn test_operator_chain_at_limit_is_accepted() {
    let stmt = parse_ok(&sum_chain(MAX_BINARY_OPERATORS as usize));
    assert!(matches!(stmt.kind, StmtKind::Expr(_)));
}

#[test]
fn test_operator_chain_beyond_limit_is_rejected() {
    let limit = MAX_BINARY_OPERATORS as usize;
    let err = parse_err(&sum_chain(limit + 1));
    assert_eq!(err.code, ErrorCode::NESTING_TOO_DEEP);
    // the first operator past the budget, at `1` + limit * `+1`
    assert_eq!(err.offset(), 1 + 2 * limit);
    assert_eq!(err.found, "'+'");

    let err = parse_err(&sum_chain(100_000));
    assert_eq!(err.code, ErrorCode::NESTING_TOO_DEEP);
}

#[test]
fn test_operator_budget_spans_the_whole_statement() {
    let half = MAX_BINARY_OPERATORS as usize / 2;
    let product = vec!["2"; half + 1].join("*");
    let source = format!("x = ({}) - ({})", product, product);
    assert_eq!(parse_err(&source).code, ErrorCode::NESTING_TOO_DEEP);

    let source = format!("[{}] == [{}]", sum_chain(half - 1), sum_chain(half - 1));
    assert!(matches!(parse_ok(&source).kind, StmtKind::Expr(_)));
}

#[test]
fn test_parse_without_trailing_eof_token() {
    let mut tokens = tokenize("1 + 2").unwrap();
    tokens.pop();
    let stmt = parse(tokens).unwrap();
    assert!(matches!(stmt.kind, StmtKind::Expr(_)));
    assert!(parse(Vec::new()).is_ok());
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "x = max(1, 2) * (3 - -4) >= len([1, \"a\"])";
    let first = parse_ok(source);
    for i in 0..100 {
        assert_eq!(first, parse_ok(source), "iteration {i}");
    }
}
