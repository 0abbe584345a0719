//! Formula dependency depth.
//!
//! The depth of a cell is the length of its longest chain of formula
//! references: 0 for anything that is not a formula, 1 for a formula whose
//! references (if any) are all non-formula cells, and so on. A cell on a
//! cycle, or one that reaches a cycle, has depth [`CYCLIC_DEPTH`].
//!
//! Depth is computed from the raw formula text with its own visited path, so
//! it never looks at or changes evaluation state. The walk keeps its frames on
//! an explicit stack, like the evaluator.

use std::collections::HashSet;

use super::cell::Grid;
use super::cell_ref::CellRef;
use super::deps::extract_dependencies;

/// Depth reported for cells on or behind a circular reference.
pub const CYCLIC_DEPTH: i32 = -1;

/// Depth of a single cell.
pub fn depth(grid: &Grid, cell_ref: CellRef) -> i32 {
    walk(grid, cell_ref)
}

/// Depth of every cell, indexed `[col][row]`.
pub fn depths(grid: &Grid) -> Vec<Vec<i32>> {
    (0..grid.width())
        .map(|col| {
            (0..grid.height())
                .map(|row| depth(grid, CellRef::new(col, row)))
                .collect()
        })
        .collect()
}

/// A formula cell whose references are being walked.
struct DepthFrame {
    cell_ref: CellRef,
    deps: std::vec::IntoIter<CellRef>,
    deepest: i32,
}

impl DepthFrame {
    /// `None` for anything that is not a formula; those have depth 0.
    fn open(grid: &Grid, cell_ref: CellRef) -> Option<DepthFrame> {
        let expr = grid.get(&cell_ref)?.formula()?;
        Some(DepthFrame {
            cell_ref,
            deps: extract_dependencies(expr).into_iter(),
            deepest: 0,
        })
    }
}

/// Depth-first walk with an explicit stack. `path` holds the cells between
/// the start and the frame being walked.
fn walk(grid: &Grid, start: CellRef) -> i32 {
    let Some(mut frame) = DepthFrame::open(grid, start) else {
        return 0;
    };
    let mut path = HashSet::from([start]);
    let mut parents: Vec<DepthFrame> = Vec::new();

    loop {
        if let Some(dep) = frame.deps.next() {
            if let Some(child) = DepthFrame::open(grid, dep) {
                if !path.insert(dep) {
                    return CYCLIC_DEPTH;
                }
                parents.push(std::mem::replace(&mut frame, child));
            }
            continue;
        }

        let done = frame.deepest + 1;
        path.remove(&frame.cell_ref);
        match parents.pop() {
            Some(parent) => {
                frame = parent;
                frame.deepest = frame.deepest.max(done);
            }
            None => return done,
        }
    }
}
