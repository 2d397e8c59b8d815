//! Runtime values.
//!
//! Values are produced by the evaluator and stored in the environment. They
//! are immutable once produced; errors are never values.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer. Integer arithmetic is checked.
    Int(i64),
    /// Finite double-precision float. Non-finite results are rejected by the
    /// evaluator before a `Float` is ever built.
    Float(f64),
    /// Text.
    Text(String),
    /// `true` / `false`
    Bool(bool),
    /// Ordered list of values: `[1, 2, 3]`
    List(Vec<Value>),
}

impl Value {
    /// Name of the value's type, as shown in error messages and by `type_of`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
        }
    }

    /// Returns `true` for `Int` and `Float`.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Render the value as it appears inside a list: text is quoted so that
    /// `["a, b"]` and `["a", "b"]` stay distinguishable.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s:?}"),
            other => write!(f, "{other}"),
        }
    }
}

/// Canonical float rendering: shortest round-trip form, with `.0` appended to
/// integral values so floats never print like integers.
pub(crate) fn format_float(n: f64) -> String {
    let s = n.to_string();
    if !n.is_finite() || s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{s}.0")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => f.write_str(&format_float(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers() {
        assert_eq!(Value::Int(14).to_string(), "14");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(0.1).to_string(), "0.1");
    }

    #[test]
    fn test_display_text_and_bool() {
        assert_eq!(Value::from("hello world").to_string(), "hello world");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_display_list_quotes_nested_text() {
        let v = Value::List(vec![
            Value::Int(1),
            Value::from("a, b"),
            Value::List(vec![Value::Float(1.0)]),
        ]);
        assert_eq!(v.to_string(), r#"[1, "a, b", [1.0]]"#);
        assert_eq!(Value::List(vec![]).to_string(), "[]");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Float(1.0).type_name(), "float");
        assert_eq!(Value::from("x").type_name(), "text");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::List(vec![]).type_name(), "list");
    }

    #[test]
    fn test_json_serialization() {
        let v = Value::List(vec![
            Value::Int(2),
            Value::Float(2.5),
            Value::from("hi"),
            Value::Bool(false),
        ]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"[2,2.5,"hi",false]"#);
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::from("3").as_f64(), None);
        assert!(Value::Int(0).is_number());
        assert!(!Value::Bool(true).is_number());
    }
}
