//! pils interpreter as a WASM module for browser environments.
//!
//! This crate exposes one process-wide interpreter session via
//! `wasm-bindgen`. The page sends one line per call and displays whatever
//! string comes back; nothing but owned strings crosses the boundary.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { process_str, get_env_json } from 'pils-wasm';
//!
//! await init();
//!
//! process_str("x = 6 * 7");   // "42"
//! process_str("x + )");       // "Error [E200] at column 5: expected expression, found ')'"
//! JSON.parse(get_env_json()); // { pi: 3.14..., e: 2.71..., tau: 6.28..., x: 42 }
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use pils_eval::{help::HELP_TEXT, Session};
use wasm_bindgen::prelude::*;

/// The single environment every call reads and mutates.
static SESSION: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::new()));

/// Lock the shared session for the whole read-modify-write of one call.
///
/// A poisoned lock is taken over: assignment commits last, so the session
/// is consistent even if a previous holder panicked.
fn session() -> MutexGuard<'static, Session> {
    SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Evaluate one line against the shared environment.
///
/// Returns the rendered value, an empty string for a blank line, or an
/// `Error [E...]` message. Only a successful assignment changes state.
#[wasm_bindgen]
#[must_use]
pub fn process_str(line: &str) -> String {
    session().process_str(line)
}

/// Return the help text: grammar, operators and the built-in functions.
#[wasm_bindgen]
#[must_use]
pub fn help_text() -> String {
    HELP_TEXT.to_string()
}

/// Return the current environment as a pretty-printed JSON object, in
/// assignment order.
#[wasm_bindgen]
#[must_use]
pub fn get_env_json() -> String {
    session()
        .env_json()
        .unwrap_or_else(|e| format!("Error: serialization failed: {e}"))
}

/// Return the current environment as `(name, value)` lines.
#[wasm_bindgen]
#[must_use]
pub fn get_env_tuples() -> String {
    session().env_tuples()
}

/// Return a fixed demo environment as JSON. Does not touch the shared
/// session.
#[wasm_bindgen]
#[must_use]
pub fn get_example_environment() -> String {
    pils_eval::example_environment()
        .unwrap_or_else(|e| format!("Error: serialization failed: {e}"))
}

/// Return the interpreter version string.
#[wasm_bindgen]
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
