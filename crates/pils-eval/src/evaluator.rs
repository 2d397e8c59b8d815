//! Core expression and statement evaluator.

use std::cmp::Ordering;

use pils_types::ast::*;
use pils_types::Value;

use crate::builtins::{compare_numbers, BuiltinRegistry, BUILTINS};
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};

/// Evaluate one statement against `env`.
///
/// Returns `None` for an empty statement. An assignment yields the assigned
/// value; the environment is only written once the right-hand side has been
/// fully evaluated, so a failing line never changes it.
pub fn evaluate(stmt: &Stmt, env: &mut Environment) -> EvalResult<Option<Value>> {
    Evaluator::new(env).eval_stmt(stmt)
}

/// Walks AST nodes and produces Values.
pub struct Evaluator<'env> {
    env: &'env mut Environment,
    builtins: &'static BuiltinRegistry,
}

impl<'env> Evaluator<'env> {
    pub fn new(env: &'env mut Environment) -> Self {
        Self {
            env,
            builtins: &BUILTINS,
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<Option<Value>> {
        match &stmt.kind {
            StmtKind::Empty => Ok(None),
            StmtKind::Expr(expr) => self.eval_expr(expr).map(Some),
            StmtKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.env.assign(&name.name, value.clone());
                Ok(Some(value))
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::List(items) => self.eval_list_literal(items),
            ExprKind::Identifier(name) => self.eval_identifier(name),
            ExprKind::Call { name, args } => self.eval_call(&name.name, args),
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    fn eval_list_literal(&mut self, items: &[Expr]) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(self.eval_expr(item)?);
        }
        Ok(Value::List(values))
    }

    // ── Identifiers & Calls ──────────────────────────────────────────────

    fn eval_identifier(&self, name: &str) -> EvalResult<Value> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedName(name.to_string()))
    }

    /// `name(args)`. The name is resolved before any argument is evaluated.
    fn eval_call(&mut self, name: &str, args: &[Expr]) -> EvalResult<Value> {
        let builtins = self.builtins;
        let builtin = builtins
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        builtin.call(&values)
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        match op {
            BinOp::Add => eval_add(&lv, &rv),
            BinOp::Sub => eval_arith(&lv, &rv, op, i64::checked_sub, |a, b| a - b),
            BinOp::Mul => eval_arith(&lv, &rv, op, i64::checked_mul, |a, b| a * b),
            BinOp::Div => eval_div(&lv, &rv),
            BinOp::Mod => eval_mod(&lv, &rv),
            BinOp::Eq => Ok(Value::Bool(values_equal(&lv, &rv))),
            BinOp::NotEq => Ok(Value::Bool(!values_equal(&lv, &rv))),
            BinOp::Less => eval_comparison(&lv, &rv, op, Ordering::is_lt),
            BinOp::Greater => eval_comparison(&lv, &rv, op, Ordering::is_gt),
            BinOp::LessEq => eval_comparison(&lv, &rv, op, Ordering::is_le),
            BinOp::GreaterEq => eval_comparison(&lv, &rv, op, Ordering::is_ge),
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> EvalResult<Value> {
        let val = self.eval_expr(operand)?;
        match (op, &val) {
            (UnaryOp::Neg, Value::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| EvalError::Overflow(op.as_str().to_string())),
            (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            _ => Err(EvalError::OperandMismatch {
                op: op.as_str(),
                operand: val.type_name(),
            }),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operator semantics
// ══════════════════════════════════════════════════════════════════════════

fn mismatch(op: BinOp, lv: &Value, rv: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op: op.as_str(),
        left: lv.type_name(),
        right: rv.type_name(),
    }
}

fn overflow(op: BinOp) -> EvalError {
    EvalError::Overflow(op.as_str().to_string())
}

/// Wrap a float result, rejecting infinities and NaN.
fn float_result(op: BinOp, n: f64) -> EvalResult<Value> {
    if n.is_finite() {
        Ok(Value::Float(n))
    } else {
        Err(overflow(op))
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Int(n) => *n == 0,
        Value::Float(n) => *n == 0.0,
        _ => false,
    }
}

fn eval_add(lv: &Value, rv: &Value) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) => {
            Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => eval_arith(lv, rv, BinOp::Add, i64::checked_add, |a, b| a + b),
    }
}

/// Int op Int stays an Int (checked); any Float operand makes it a Float.
fn eval_arith(
    lv: &Value,
    rv: &Value,
    op: BinOp,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b).map(Value::Int).ok_or_else(|| overflow(op)),
        _ => match (lv.as_f64(), rv.as_f64()) {
            (Some(a), Some(b)) => float_result(op, float_op(a, b)),
            _ => Err(mismatch(op, lv, rv)),
        },
    }
}

/// `7 / 2` is `3.5`, `6 / 2` is `3`.
fn eval_div(lv: &Value, rv: &Value) -> EvalResult<Value> {
    if !(lv.is_number() && rv.is_number()) {
        return Err(mismatch(BinOp::Div, lv, rv));
    }
    if is_zero(rv) {
        return Err(EvalError::DivideByZero);
    }
    if let (Value::Int(a), Value::Int(b)) = (lv, rv) {
        // `checked_rem` is None only for i64::MIN / -1, which then overflows
        return match a.checked_rem(*b) {
            Some(0) | None => a.checked_div(*b).map(Value::Int).ok_or_else(|| overflow(BinOp::Div)),
            Some(_) => float_result(BinOp::Div, *a as f64 / *b as f64),
        };
    }
    eval_arith(lv, rv, BinOp::Div, i64::checked_div, |a, b| a / b)
}

/// Remainder takes the sign of the dividend: `-7 % 3` is `-1`.
fn eval_mod(lv: &Value, rv: &Value) -> EvalResult<Value> {
    if !(lv.is_number() && rv.is_number()) {
        return Err(mismatch(BinOp::Mod, lv, rv));
    }
    if is_zero(rv) {
        return Err(EvalError::DivideByZero);
    }
    eval_arith(lv, rv, BinOp::Mod, i64::checked_rem, |a, b| a % b)
}

/// Structural equality. Numbers compare by value across Int/Float; values of
/// different kinds are never equal.
pub fn values_equal(lv: &Value, rv: &Value) -> bool {
    match (lv, rv) {
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        _ if lv.is_number() && rv.is_number() => compare_numbers(lv, rv) == Some(Ordering::Equal),
        _ => false,
    }
}

fn eval_comparison(
    lv: &Value,
    rv: &Value,
    op: BinOp,
    test: fn(Ordering) -> bool,
) -> EvalResult<Value> {
    let ordering = match (lv, rv) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ if lv.is_number() && rv.is_number() => compare_numbers(lv, rv),
        _ => return Err(mismatch(op, lv, rv)),
    };
    Ok(Value::Bool(ordering.map_or(false, test)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_equal_across_numeric_kinds() {
        assert!(values_equal(&Value::Int(2), &Value::Float(2.0)));
        assert!(!values_equal(&Value::Int(2), &Value::from("2")));
        assert!(values_equal(
            &Value::List(vec![Value::Int(1)]),
            &Value::List(vec![Value::Float(1.0)])
        ));
        assert!(!values_equal(
            &Value::List(vec![Value::Int(1)]),
            &Value::List(vec![Value::Int(1), Value::Int(2)])
        ));
    }

    #[test]
    fn test_division_kinds() {
        assert_eq!(eval_div(&Value::Int(6), &Value::Int(2)), Ok(Value::Int(3)));
        assert_eq!(eval_div(&Value::Int(7), &Value::Int(2)), Ok(Value::Float(3.5)));
        assert_eq!(eval_div(&Value::Int(-7), &Value::Int(2)), Ok(Value::Float(-3.5)));
        assert_eq!(
            eval_div(&Value::Int(i64::MIN), &Value::Int(-1)),
            Err(EvalError::Overflow("/".into()))
        );
        assert_eq!(
            eval_div(&Value::Float(1.0), &Value::Float(0.0)),
            Err(EvalError::DivideByZero)
        );
    }

    #[test]
    fn test_mod_sign_follows_dividend() {
        assert_eq!(eval_mod(&Value::Int(-7), &Value::Int(3)), Ok(Value::Int(-1)));
        assert_eq!(eval_mod(&Value::Float(7.5), &Value::Int(2)), Ok(Value::Float(1.5)));
        assert_eq!(eval_mod(&Value::Int(1), &Value::Int(0)), Err(EvalError::DivideByZero));
    }

    #[test]
    fn test_float_overflow_is_reported() {
        assert_eq!(
            eval_arith(
                &Value::Float(f64::MAX),
                &Value::Float(f64::MAX),
                BinOp::Mul,
                i64::checked_mul,
                |a, b| a * b
            ),
            Err(EvalError::Overflow("*".into()))
        );
    }
}
