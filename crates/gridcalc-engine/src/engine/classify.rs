//! Classification of raw cell input.
//!
//! Every string maps to exactly one [`CellKind`]; the functions here are pure
//! so callers decide what to store.

use regex::Regex;
use std::sync::OnceLock;

use super::cell::{CYCLE_ERROR, CellKind, FORMULA_ERROR};

/// Classify raw cell input.
///
/// - Empty or whitespace-only -> `Empty`
/// - Starts with `=` -> `Formula` if the body is non-empty, has balanced
///   parentheses and no illegal operator runs, else `MalformedFormula`
/// - Parses as a finite real number -> `Number`
/// - Otherwise `Text`, unless it contains an illegal operator run or collides
///   with an error sentinel, in which case `MalformedFormula`
pub fn classify(raw: &str) -> CellKind {
    if raw.trim().is_empty() {
        CellKind::Empty
    } else if raw.starts_with('=') {
        if formula_body(raw).is_some() {
            CellKind::Formula
        } else {
            CellKind::MalformedFormula
        }
    } else if parse_number(raw).is_some() {
        CellKind::Number
    } else if is_text(raw) {
        CellKind::Text
    } else {
        CellKind::MalformedFormula
    }
}

/// The expression of a well-formed formula (without `=`, trimmed).
pub fn formula_body(raw: &str) -> Option<&str> {
    let body = raw.strip_prefix('=')?.trim();
    let well_formed =
        !body.is_empty() && parentheses_balanced(body) && !has_illegal_operator_run(body);
    well_formed.then_some(body)
}

/// Parse a numeric cell. Only finite values count as numbers.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_text(raw: &str) -> bool {
    !raw.starts_with('=')
        && !has_illegal_operator_run(raw)
        && raw != FORMULA_ERROR
        && raw != CYCLE_ERROR
}

/// True when every `)` closes an earlier `(` and none are left open.
pub fn parentheses_balanced(expr: &str) -> bool {
    let mut open = 0usize;
    for c in expr.chars() {
        match c {
            '(' => open += 1,
            ')' => match open.checked_sub(1) {
                Some(n) => open = n,
                None => return false,
            },
            _ => {}
        }
    }
    open == 0
}

/// Adjacent operators are illegal, except a `-` sign directly after
/// `+`, `*` or `/` (`2*-3`). `--` and longer runs are always rejected.
pub fn has_illegal_operator_run(expr: &str) -> bool {
    operator_run_re()
        .find_iter(expr)
        .any(|run| !matches!(run.as_str(), "+-" | "*-" | "/-"))
}

fn operator_run_re() -> &'static Regex {
    static RUN_RE: OnceLock<Regex> = OnceLock::new();
    RUN_RE.get_or_init(|| Regex::new(r"[+\-*/]{2,}").expect("operator run regex must compile"))
}
