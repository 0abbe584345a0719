//! Errors raised while resolving and evaluating a single formula.
//!
//! These never leave the engine: the evaluation driver converts every one of
//! them into a cell error state plus a sentinel value.

use thiserror::Error;

use super::cell_ref::CellRef;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Formula references an empty cell: {0}")]
    EmptyReference(String),

    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Circular reference detected at {0}")]
    CycleDetected(CellRef),
}

impl EvalError {
    pub(crate) fn malformed(detail: impl Into<String>) -> EvalError {
        EvalError::MalformedExpression(detail.into())
    }
}
