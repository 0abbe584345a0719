//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`CellContent`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`] - Cell name parsing (`A0` notation ↔ column/row indices)
//! - [`classify`] - Decide what kind of content raw input is
//! - [`tokenize`], [`evaluate`] - Arithmetic over substituted expressions
//! - [`resolve_references`] - Replace cell references by their values
//! - [`Evaluator`] - Cycle-safe per-cell and whole-grid evaluation
//! - [`depth`] - Longest formula reference chain per cell
//! - [`format_number`] - Canonical decimal strings

mod cell;
mod cell_ref;
mod classify;
mod config;
mod cycle;
mod depth;
mod deps;
mod error;
mod eval;
mod evaluate;
mod format;
mod resolve;
mod tokenize;

pub use cell::{
    CYCLE_ERROR, Cell, CellContent, CellError, CellErrorKind, CellKind, EMPTY_CELL, FORMULA_ERROR,
    Grid,
};
pub use cell_ref::{CellRef, MAX_COLUMNS};
pub use classify::{classify, formula_body, has_illegal_operator_run, parentheses_balanced, parse_number};
pub use config::{DivisionByZero, EngineConfig};
pub use cycle::EvalContext;
pub use depth::{CYCLIC_DEPTH, depth, depths};
pub use deps::extract_dependencies;
pub use error::EvalError;
pub use eval::Evaluator;
pub use evaluate::{evaluate, evaluate_expression};
pub use format::format_number;
pub use resolve::{ReferenceToken, Substitution, resolve_references, scan_references};
pub use tokenize::{Operator, Token, Tokenizer, tokenize};
