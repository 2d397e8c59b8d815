//! Built-in function registry.
//!
//! The table is fixed: calls resolve only against it, never against the
//! environment. Every entry carries its signature and a one-line
//! description, from which the help text is generated.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use pils_types::Value;

use crate::error::{EvalError, EvalResult};

/// Process-wide built-in table.
pub static BUILTINS: Lazy<BuiltinRegistry> = Lazy::new(BuiltinRegistry::new);

/// Number of arguments a built-in accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, n) = match self {
            Arity::Exact(n) => ("", *n),
            Arity::AtLeast(n) => ("at least ", *n),
        };
        let noun = if n == 1 { "argument" } else { "arguments" };
        write!(f, "{prefix}{n} {noun}")
    }
}

/// Implementation of a built-in. Receives its own name (for error messages)
/// and the already-evaluated arguments, whose count matches the arity.
pub type BuiltinFn = fn(&str, &[Value]) -> EvalResult<Value>;

/// One entry of the built-in table.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    /// Group the function is listed under in the help text.
    pub group: &'static str,
    pub arity: Arity,
    /// Call shape shown in the help text, e.g. `pow(base, exp)`.
    pub signature: &'static str,
    pub description: &'static str,
    func: BuiltinFn,
}

impl Builtin {
    /// Check the argument count, then run the function.
    pub fn call(&self, args: &[Value]) -> EvalResult<Value> {
        if !self.arity.accepts(args.len()) {
            return Err(EvalError::WrongArgCount {
                name: self.name.to_string(),
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.func)(self.name, args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Registry mapping function name → [`Builtin`], in registration order.
#[derive(Debug)]
pub struct BuiltinRegistry {
    functions: IndexMap<&'static str, Builtin>,
}

impl BuiltinRegistry {
    /// Create a registry with every built-in registered.
    pub fn new() -> Self {
        let mut reg = Self {
            functions: IndexMap::new(),
        };
        reg.register_math();
        reg.register_text();
        reg.register_list();
        reg.register_conversion();
        reg
    }

    /// Look up a built-in by name.
    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// All built-ins in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Builtin> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    // ──────────────────────────────────────────────────────────────────────
    // Registration helpers
    // ──────────────────────────────────────────────────────────────────────

    fn add(
        &mut self,
        group: &'static str,
        name: &'static str,
        arity: Arity,
        signature: &'static str,
        description: &'static str,
        func: BuiltinFn,
    ) {
        self.functions.insert(
            name,
            Builtin {
                name,
                group,
                arity,
                signature,
                description,
                func,
            },
        );
    }

    // ══════════════════════════════════════════════════════════════════════
    // Groups
    // ══════════════════════════════════════════════════════════════════════

    fn register_math(&mut self) {
        use Arity::*;
        self.add("math", "abs", Exact(1), "abs(x)", "Absolute value", abs);
        self.add("math", "min", AtLeast(1), "min(x, ...)", "Smallest of the arguments", min);
        self.add("math", "max", AtLeast(1), "max(x, ...)", "Largest of the arguments", max);
        self.add("math", "sqrt", Exact(1), "sqrt(x)", "Square root of a non-negative number", sqrt);
        self.add("math", "floor", Exact(1), "floor(x)", "Round down to an int", floor);
        self.add("math", "ceil", Exact(1), "ceil(x)", "Round up to an int", ceil);
        self.add("math", "round", Exact(1), "round(x)", "Round to the nearest int (halves away from zero)", round);
        self.add("math", "pow", Exact(2), "pow(base, exp)", "Exponentiation; int when both are ints and exp >= 0", pow);
    }

    fn register_text(&mut self) {
        use Arity::*;
        self.add("text", "len", Exact(1), "len(x)", "Number of characters in a text or items in a list", len);
        self.add("text", "upper", Exact(1), "upper(s)", "Convert text to uppercase", upper);
        self.add("text", "lower", Exact(1), "lower(s)", "Convert text to lowercase", lower);
    }

    fn register_list(&mut self) {
        use Arity::*;
        self.add("list", "list", AtLeast(0), "list(x, ...)", "List of the arguments", list);
        self.add("list", "head", Exact(1), "head(xs)", "First item of a non-empty list", head);
        self.add("list", "tail", Exact(1), "tail(xs)", "All items of a non-empty list except the first", tail);
        self.add("list", "join", AtLeast(1), "join(xs, ...)", "Concatenate lists into one", join);
    }

    fn register_conversion(&mut self) {
        use Arity::*;
        self.add("conversion", "str", Exact(1), "str(x)", "Render any value as text", to_text);
        self.add("conversion", "num", Exact(1), "num(x)", "Parse text as an int or float", num);
        self.add("conversion", "type_of", Exact(1), "type_of(x)", "Type name: int, float, text, bool or list", type_of);
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ──────────────────────────────────────────────────────────────────────────
// Argument helpers
// ──────────────────────────────────────────────────────────────────────────

fn expect_number(name: &str, value: &Value) -> EvalResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| EvalError::invalid(name, format!("expected a number, got {}", value.type_name())))
}

fn expect_text<'v>(name: &str, value: &'v Value) -> EvalResult<&'v str> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(EvalError::invalid(
            name,
            format!("expected text, got {}", other.type_name()),
        )),
    }
}

fn expect_list<'v>(name: &str, value: &'v Value) -> EvalResult<&'v [Value]> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(EvalError::invalid(
            name,
            format!("expected a list, got {}", other.type_name()),
        )),
    }
}

/// Reject NaN and infinities produced by float math.
fn finite(name: &str, n: f64) -> EvalResult<Value> {
    if n.is_nan() {
        Err(EvalError::invalid(name, "result is not a number"))
    } else if n.is_infinite() {
        Err(EvalError::Overflow(name.to_string()))
    } else {
        Ok(Value::Float(n))
    }
}

/// Convert an already-rounded float to an int, failing outside `i64` range.
fn float_to_int(name: &str, n: f64) -> EvalResult<Value> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Ok(Value::Int(n as i64))
    } else {
        Err(EvalError::Overflow(name.to_string()))
    }
}

/// Numeric ordering. Ints compare exactly; mixed pairs compare as floats.
pub(crate) fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

// ──────────────────────────────────────────────────────────────────────────
// math
// ──────────────────────────────────────────────────────────────────────────

fn abs(name: &str, args: &[Value]) -> EvalResult<Value> {
    match &args[0] {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| EvalError::Overflow(name.to_string())),
        other => Ok(Value::Float(expect_number(name, other)?.abs())),
    }
}

fn extreme(name: &str, args: &[Value], keep: Ordering) -> EvalResult<Value> {
    let mut best = &args[0];
    expect_number(name, best)?;
    for candidate in &args[1..] {
        expect_number(name, candidate)?;
        if compare_numbers(candidate, best) == Some(keep) {
            best = candidate;
        }
    }
    Ok(best.clone())
}

fn min(name: &str, args: &[Value]) -> EvalResult<Value> {
    extreme(name, args, Ordering::Less)
}

fn max(name: &str, args: &[Value]) -> EvalResult<Value> {
    extreme(name, args, Ordering::Greater)
}

fn sqrt(name: &str, args: &[Value]) -> EvalResult<Value> {
    let n = expect_number(name, &args[0])?;
    if n < 0.0 {
        return Err(EvalError::invalid(name, "cannot take the square root of a negative number"));
    }
    finite(name, n.sqrt())
}

fn rounding(name: &str, value: &Value, op: fn(f64) -> f64) -> EvalResult<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        other => float_to_int(name, op(expect_number(name, other)?)),
    }
}

fn floor(name: &str, args: &[Value]) -> EvalResult<Value> {
    rounding(name, &args[0], f64::floor)
}

fn ceil(name: &str, args: &[Value]) -> EvalResult<Value> {
    rounding(name, &args[0], f64::ceil)
}

fn round(name: &str, args: &[Value]) -> EvalResult<Value> {
    rounding(name, &args[0], f64::round)
}

fn pow(name: &str, args: &[Value]) -> EvalResult<Value> {
    if let (Value::Int(base), Value::Int(exp)) = (&args[0], &args[1]) {
        if *exp >= 0 {
            return u32::try_from(*exp)
                .ok()
                .and_then(|e| base.checked_pow(e))
                .map(Value::Int)
                .ok_or_else(|| EvalError::Overflow(name.to_string()));
        }
    }
    let base = expect_number(name, &args[0])?;
    let exp = expect_number(name, &args[1])?;
    if base == 0.0 && exp < 0.0 {
        return Err(EvalError::DivideByZero);
    }
    finite(name, base.powf(exp))
}

// ──────────────────────────────────────────────────────────────────────────
// text
// ──────────────────────────────────────────────────────────────────────────

fn len(name: &str, args: &[Value]) -> EvalResult<Value> {
    let count = match &args[0] {
        Value::Text(s) => s.chars().count(),
        Value::List(items) => items.len(),
        other => {
            return Err(EvalError::invalid(
                name,
                format!("expected text or a list, got {}", other.type_name()),
            ))
        }
    };
    i64::try_from(count)
        .map(Value::Int)
        .map_err(|_| EvalError::Overflow(name.to_string()))
}

fn upper(name: &str, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Text(expect_text(name, &args[0])?.to_uppercase()))
}

fn lower(name: &str, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Text(expect_text(name, &args[0])?.to_lowercase()))
}

// ──────────────────────────────────────────────────────────────────────────
// list
// ──────────────────────────────────────────────────────────────────────────

fn list(_name: &str, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::List(args.to_vec()))
}

fn head(name: &str, args: &[Value]) -> EvalResult<Value> {
    expect_list(name, &args[0])?
        .first()
        .cloned()
        .ok_or_else(|| EvalError::invalid(name, "list is empty"))
}

fn tail(name: &str, args: &[Value]) -> EvalResult<Value> {
    match expect_list(name, &args[0])? {
        [] => Err(EvalError::invalid(name, "list is empty")),
        [_, rest @ ..] => Ok(Value::List(rest.to_vec())),
    }
}

fn join(name: &str, args: &[Value]) -> EvalResult<Value> {
    let mut joined = Vec::new();
    for arg in args {
        joined.extend_from_slice(expect_list(name, arg)?);
    }
    Ok(Value::List(joined))
}

// ──────────────────────────────────────────────────────────────────────────
// conversion
// ──────────────────────────────────────────────────────────────────────────

fn to_text(_name: &str, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Text(args[0].to_string()))
}

fn num(name: &str, args: &[Value]) -> EvalResult<Value> {
    let text = match &args[0] {
        Value::Int(_) | Value::Float(_) => return Ok(args[0].clone()),
        other => expect_text(name, other)?.trim(),
    };
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Value::Float(n)),
        _ => Err(EvalError::invalid(
            name,
            format!("cannot convert {text:?} to a number"),
        )),
    }
}

fn type_of(_name: &str, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::from(args[0].type_name()))
}
