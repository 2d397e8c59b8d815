//! Help text, generated from the built-in registry.
//!
//! The function listing is produced from [`BUILTINS`] so it cannot drift from
//! what the evaluator actually accepts.

use once_cell::sync::Lazy;
use pils_lexer::ALL_KEYWORDS;

use crate::builtins::BUILTINS;
use crate::env::CONSTANTS;

/// Canonical group ordering for output stability.
const GROUP_ORDER: &[&str] = &["math", "text", "list", "conversion"];

const INTRO: &str = r#"Welcome to pils, a small expression language.

Type one statement per line. A statement is either an expression, which is
evaluated and printed, or an assignment, which stores the value under a name:

    2 + 3 * 4
    (2 + 3) * 4
    answer = 6 * 7
    greeting = "hello" + " world"
    items = tail([1, 2, 3, 4])
    round(pi * pow(2, 2)) < max(answer, 10)

Values: ints (42), floats (3.5), text ("hi"), booleans (true, false) and
lists ([1, "a", true]).

Operators, from lowest to highest precedence:
    ==  !=  <  >  <=  >=     comparison (does not chain)
    +  -                     addition, subtraction, text/list concatenation
    *  /  %                  multiplication, division, remainder
    -x  not x                negation
Parentheses group. `7 / 2` is 3.5; `6 / 2` is 3.
"#;

/// Full help text.
pub static HELP_TEXT: Lazy<String> = Lazy::new(render_help);

fn render_help() -> String {
    let mut out = String::from(INTRO);

    out.push_str("\nBuilt-in functions:\n");
    for group in GROUP_ORDER {
        out.push_str(&format!("  {group}\n"));
        for builtin in BUILTINS.iter().filter(|b| b.group == *group) {
            out.push_str(&format!(
                "    {:<18} {}\n",
                builtin.signature, builtin.description
            ));
        }
    }

    let names: Vec<&str> = CONSTANTS.iter().map(|(name, _)| *name).collect();
    out.push_str(&format!("\nConstants: {}\n", names.join(", ")));
    out.push_str(&format!(
        "Reserved words: {}\n",
        ALL_KEYWORDS.join(", ")
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_builtin() {
        for builtin in BUILTINS.iter() {
            assert!(
                HELP_TEXT.contains(builtin.signature),
                "help text is missing {}",
                builtin.name
            );
        }
    }

    #[test]
    fn test_every_group_is_ordered() {
        for builtin in BUILTINS.iter() {
            assert!(GROUP_ORDER.contains(&builtin.group), "{}", builtin.group);
        }
    }

    #[test]
    fn test_help_mentions_constants() {
        assert!(HELP_TEXT.contains("Constants: pi, e, tau"));
    }

    #[test]
    fn test_help_lists_reserved_words() {
        assert!(HELP_TEXT.contains("Reserved words: true, false, not"));
    }

    #[test]
    fn test_help_rows_are_line_terminated() {
        assert!(HELP_TEXT.ends_with('\n'));
        assert!(HELP_TEXT.contains("  math\n    abs(x)"));
    }
}
