//! One interpreter session: a persistent environment plus the
//! lex → parse → evaluate pipeline that runs each line against it.

use log::{debug, trace, warn};
use pils_types::Value;

use crate::env::Environment;
use crate::error::Error;
use crate::evaluator::evaluate;

/// Lines run against a bare environment to build the demo environment.
pub const EXAMPLE_SCRIPT: &[&str] = &[
    r#"greeting = "hello""#,
    "answer = 6 * 7",
    "ratio = 7 / 2",
    "items = tail([1, 2, 3, 4])",
    "shout = upper(greeting) + \"!\"",
    "big = answer > 40",
];

/// Owns the environment that successive lines read and mutate.
#[derive(Debug, Clone, Default)]
pub struct Session {
    env: Environment,
}

impl Session {
    /// Session over the default environment (built-in constants only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Session over a caller-supplied environment.
    pub fn with_environment(env: Environment) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Run one line. `Ok(None)` means the line was blank.
    ///
    /// On any error the environment is exactly as it was before the call.
    pub fn process(&mut self, line: &str) -> Result<Option<Value>, Error> {
        debug!("process {line:?}");
        let tokens = pils_lexer::tokenize(line)?;
        trace!("tokens: {tokens:?}");
        let stmt = pils_parser::parse(tokens)?;
        trace!("ast: {stmt:?}");
        Ok(evaluate(&stmt, &mut self.env)?)
    }

    /// Run one line and render the outcome as text. Blank lines give an
    /// empty string; errors give their `Error [E...]` rendering.
    pub fn process_str(&mut self, line: &str) -> String {
        match self.process(line) {
            Ok(Some(value)) => value.to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                debug!("line failed: {e}");
                e.render()
            }
        }
    }

    /// Current environment as a pretty-printed JSON object.
    pub fn env_json(&self) -> serde_json::Result<String> {
        self.env.to_json()
    }

    /// Current environment as `(name, value)` lines.
    pub fn env_tuples(&self) -> String {
        self.env.to_tuples()
    }
}

/// JSON for the demo environment built by [`EXAMPLE_SCRIPT`].
///
/// Runs in a fresh session of its own, so it never touches any live
/// environment and always yields the same text.
pub fn example_environment() -> serde_json::Result<String> {
    let mut session = Session::with_environment(Environment::empty());
    for line in EXAMPLE_SCRIPT {
        if let Err(e) = session.process(line) {
            warn!("example line {line:?} failed: {e}");
        }
    }
    session.env_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_script_runs_cleanly() {
        let mut session = Session::with_environment(Environment::empty());
        for line in EXAMPLE_SCRIPT {
            assert!(session.process(line).is_ok(), "{line}");
        }
        assert_eq!(session.environment().len(), EXAMPLE_SCRIPT.len());
    }

    #[test]
    fn test_blank_line_renders_empty() {
        let mut session = Session::new();
        assert_eq!(session.process_str(""), "");
        assert_eq!(session.process_str("   \t"), "");
    }
}
