//! The persistent variable environment.

use indexmap::IndexMap;
use log::debug;
use pils_types::Value;
use serde::Serialize;

/// Constants every default environment starts with, in this order.
pub const CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
];

/// Insertion-ordered map from name to value.
///
/// Names are unique. Re-assigning an existing name replaces the value but
/// keeps the name at its original position, so both serialized views list
/// bindings in first-assignment order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Environment {
    bindings: IndexMap<String, Value>,
}

impl Environment {
    /// Environment seeded with the built-in constants.
    pub fn new() -> Self {
        let mut env = Self::empty();
        for (name, value) in CONSTANTS {
            env.bindings.insert(name.to_string(), Value::Float(*value));
        }
        env
    }

    /// Environment with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: IndexMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Insert or replace a binding.
    pub fn assign(&mut self, name: &str, value: Value) {
        debug!("bind {name} = {value}");
        self.bindings.insert(name.to_string(), value);
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Pretty-printed JSON object, values as native JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One `(name, value)` line per binding, values rendered for display.
    pub fn to_tuples(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("({name}, {value})"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_constants_in_order() {
        let env = Environment::default();
        let names: Vec<&str> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["pi", "e", "tau"]);
        assert_eq!(env.get("pi"), Some(&Value::Float(std::f64::consts::PI)));
    }

    #[test]
    fn test_reassign_keeps_position() {
        let mut env = Environment::empty();
        env.assign("a", Value::Int(1));
        env.assign("b", Value::Int(2));
        env.assign("a", Value::from("x"));
        let pairs: Vec<(&str, &Value)> = env.iter().collect();
        assert_eq!(
            pairs,
            vec![("a", &Value::from("x")), ("b", &Value::Int(2))]
        );
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_json_view() {
        let mut env = Environment::empty();
        assert_eq!(env.to_json().unwrap(), "{}");
        env.assign("x", Value::Int(5));
        env.assign("items", Value::List(vec![Value::Int(1), Value::from("a")]));
        let json: serde_json::Value = serde_json::from_str(&env.to_json().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "x": 5, "items": [1, "a"] }));
    }

    #[test]
    fn test_tuples_view() {
        let mut env = Environment::empty();
        assert_eq!(env.to_tuples(), "");
        env.assign("x", Value::Int(5));
        env.assign("name", Value::from("bob"));
        env.assign("half", Value::Float(0.5));
        assert_eq!(env.to_tuples(), "(x, 5)\n(name, bob)\n(half, 0.5)");
    }
}
