//! Reference extraction from formula expressions.
//!
//! Finds every A1-style cell reference (`A1`, `BC12`) in an expression so the
//! caller can bind values to them and build the dependency graph.
//!
//! Handles:
//! - Upper-case references only; `a1` is an ordinary identifier
//! - Ignores references inside string literals (`"..."` and `` `...` ``)
//! - Keeps duplicates and out-of-range references; callers filter

use regex::Regex;
use std::sync::OnceLock;

use super::position::Position;

/// A cell reference as written in the expression, with its resolved position.
///
/// `position` is invalid when the name is well-formed but points outside the
/// sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub position: Position,
}

fn cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z]+[0-9]+\b").unwrap())
}

/// Extract all cell references from an expression, in order of appearance.
pub fn extract_references(expression: &str) -> Vec<Reference> {
    let expression = strip_string_literals(expression);

    cell_re()
        .find_iter(&expression)
        .map(|m| Reference {
            name: m.as_str().to_string(),
            position: Position::from_a1(m.as_str()),
        })
        .collect()
}

/// Extract the positions an expression references (duplicates kept).
pub fn extract_dependencies(expression: &str) -> Vec<Position> {
    extract_references(expression)
        .into_iter()
        .map(|r| r.position)
        .collect()
}

/// Blank the contents of `"..."` and `` `...` `` literals, keeping the quotes.
/// Backtick strings are raw, so only double-quoted strings honour escapes.
fn strip_string_literals(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in expression.chars() {
        let Some(open) = quote else {
            if ch == '"' || ch == '`' {
                quote = Some(ch);
            }
            out.push(ch);
            continue;
        };

        if escaped {
            escaped = false;
            out.push(' ');
        } else if ch == '\\' && open == '"' {
            escaped = true;
            out.push(' ');
        } else if ch == open {
            quote = None;
            out.push(ch);
        } else {
            out.push(' ');
        }
    }

    out
}
