//! Circular reference tracking for formula evaluation.
//!
//! An [`EvalContext`] holds the cells on the current evaluation path. It is
//! created empty for each top-level request and passed down by reference, so
//! nothing leaks between unrelated requests. Entering a cell that is already
//! on the path means the formulas form a cycle.

use std::collections::HashSet;

use super::CellRef;

#[derive(Debug, Default)]
pub struct EvalContext {
    in_progress: HashSet<CellRef>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `cell_ref` as in progress. Returns false if it already was.
    pub fn enter(&mut self, cell_ref: CellRef) -> bool {
        self.in_progress.insert(cell_ref)
    }

    pub fn leave(&mut self, cell_ref: &CellRef) {
        self.in_progress.remove(cell_ref);
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        self.in_progress.contains(cell_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.in_progress.is_empty()
    }
}
