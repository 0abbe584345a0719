//! Dependency extraction from formula text.
//!
//! Uses the same token scan as reference resolution, but never evaluates
//! anything. Tokens that do not parse as a cell name are skipped.

use super::cell_ref::CellRef;
use super::resolve::scan_references;

/// Extract all valid cell references from an expression, in order.
pub fn extract_dependencies(expr: &str) -> Vec<CellRef> {
    scan_references(expr)
        .filter_map(|token| token.cell_ref().ok())
        .collect()
}
