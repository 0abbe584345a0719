//! Cell reference scanning and substitution.
//!
//! A reference token is a maximal run starting with an ASCII letter and
//! continuing with letters or digits (`A0`, `b12`). Tokens are upper-cased and
//! then parsed as a cell name; anything else in the expression passes through
//! untouched.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use super::cell_ref::CellRef;
use super::error::EvalError;

fn reference_re() -> &'static Regex {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    REFERENCE_RE.get_or_init(|| {
        Regex::new(r"[A-Za-z][A-Za-z0-9]*").expect("reference token regex must compile")
    })
}

/// A reference token found in an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceToken {
    pub span: Range<usize>,
    /// Upper-cased token text.
    pub name: String,
}

impl ReferenceToken {
    pub fn cell_ref(&self) -> Result<CellRef, EvalError> {
        self.name.parse()
    }
}

/// Scan an expression for reference tokens, left to right.
pub fn scan_references(expr: &str) -> impl Iterator<Item = ReferenceToken> + '_ {
    reference_re().find_iter(expr).map(|m| ReferenceToken {
        span: m.range(),
        name: m.as_str().to_ascii_uppercase(),
    })
}

/// Reference substitution over an owned expression, one reference at a time.
///
/// The caller asks for the next reference, looks its value up however it
/// likes, and hands the value back. [`resolve_references`] drives it with a
/// closure; the evaluator drives it from an explicit stack so that long
/// reference chains do not recurse.
#[derive(Debug)]
pub struct Substitution {
    expr: String,
    tokens: std::vec::IntoIter<ReferenceToken>,
    current: Option<ReferenceToken>,
    out: String,
    last: usize,
}

impl Substitution {
    pub fn new(expr: impl Into<String>) -> Substitution {
        let expr = expr.into();
        let tokens: Vec<ReferenceToken> = scan_references(&expr).collect();
        Substitution {
            tokens: tokens.into_iter(),
            current: None,
            out: String::with_capacity(expr.len()),
            last: 0,
            expr,
        }
    }

    /// The next reference to look up, or `None` once all of them have been
    /// substituted.
    pub fn next_reference(&mut self) -> Option<Result<CellRef, EvalError>> {
        let token = self.tokens.next()?;
        self.out.push_str(&self.expr[self.last..token.span.start]);
        let cell_ref = token.cell_ref();
        self.current = Some(token);
        Some(cell_ref)
    }

    /// Put `value` in place of the reference last returned by
    /// [`Substitution::next_reference`]. Empty values are rejected.
    pub fn substitute(&mut self, value: &str) -> Result<(), EvalError> {
        let Some(token) = self.current.take() else {
            return Err(EvalError::malformed("no reference to substitute"));
        };
        if value.trim().is_empty() {
            return Err(EvalError::EmptyReference(token.name));
        }
        self.out.push_str(value);
        self.last = token.span.end;
        Ok(())
    }

    /// The expression with every reference replaced.
    pub fn finish(mut self) -> String {
        self.out.push_str(&self.expr[self.last..]);
        self.out
    }
}

/// Replace every reference in `expr` by the value `lookup` returns for it.
///
/// `lookup` evaluates the referenced cell; an empty value fails with
/// [`EvalError::EmptyReference`].
pub fn resolve_references<F>(expr: &str, mut lookup: F) -> Result<String, EvalError>
where
    F: FnMut(CellRef) -> Result<String, EvalError>,
{
    let mut substitution = Substitution::new(expr);
    while let Some(cell_ref) = substitution.next_reference() {
        let value = lookup(cell_ref?)?;
        substitution.substitute(&value)?;
    }
    Ok(substitution.finish())
}
