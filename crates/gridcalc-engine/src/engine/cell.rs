//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellContent`] - What a cell holds (empty, text, number, formula, or an error)
//! - [`CellKind`] - The flat classification of a cell
//! - [`Cell`] - Raw input plus its content
//! - [`Grid`] - Fixed-size column-major storage for cells

use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;
use super::classify::{classify, formula_body, parse_number};
use super::format::format_number;

/// Value of an empty cell.
pub const EMPTY_CELL: &str = "";
/// Value of a cell whose formula could not be parsed or evaluated.
pub const FORMULA_ERROR: &str = "#ERR!";
/// Value of a cell that is part of, or depends on, a circular reference.
pub const CYCLE_ERROR: &str = "#CYCLE!";

/// The classification of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Text,
    Number,
    Formula,
    MalformedFormula,
    CycleError,
}

/// Why a cell is in error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellErrorKind {
    MalformedFormula,
    Cycle,
}

impl CellErrorKind {
    pub fn sentinel(self) -> &'static str {
        match self {
            CellErrorKind::MalformedFormula => FORMULA_ERROR,
            CellErrorKind::Cycle => CYCLE_ERROR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellError {
    pub kind: CellErrorKind,
    pub message: String,
}

impl CellError {
    pub fn new(kind: CellErrorKind) -> CellError {
        CellError {
            kind,
            message: kind.sentinel().to_string(),
        }
    }
}

/// The content stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellContent {
    Empty,
    Text(String),
    Number(f64),
    /// Formula expression, without the leading `=`.
    Formula(String),
    Error(CellError),
}

/// A cell in the spreadsheet grid.
///
/// `raw` is what was assigned (numbers in canonical form) and never changes
/// during evaluation; `content` may be switched to an error by the evaluator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    raw: String,
    pub content: CellContent,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            raw: EMPTY_CELL.to_string(),
            content: CellContent::Empty,
        }
    }

    /// Classify user input and build the matching cell.
    pub fn from_input(input: &str) -> Cell {
        match classify(input) {
            CellKind::Empty => Cell::new_empty(),
            CellKind::Number => match parse_number(input) {
                Some(n) => Cell {
                    raw: format_number(n),
                    content: CellContent::Number(n),
                },
                None => Cell::malformed(input),
            },
            CellKind::Text => Cell {
                raw: input.to_string(),
                content: CellContent::Text(input.to_string()),
            },
            CellKind::Formula => match formula_body(input) {
                Some(body) => Cell {
                    raw: input.to_string(),
                    content: CellContent::Formula(body.to_string()),
                },
                None => Cell::malformed(input),
            },
            CellKind::MalformedFormula | CellKind::CycleError => Cell::malformed(input),
        }
    }

    fn malformed(input: &str) -> Cell {
        Cell {
            raw: input.to_string(),
            content: CellContent::Error(CellError::new(CellErrorKind::MalformedFormula)),
        }
    }

    /// The content exactly as last assigned (numbers canonicalized).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> CellKind {
        match &self.content {
            CellContent::Empty => CellKind::Empty,
            CellContent::Text(_) => CellKind::Text,
            CellContent::Number(_) => CellKind::Number,
            CellContent::Formula(_) => CellKind::Formula,
            CellContent::Error(err) => match err.kind {
                CellErrorKind::MalformedFormula => CellKind::MalformedFormula,
                CellErrorKind::Cycle => CellKind::CycleError,
            },
        }
    }

    /// Error message, present only for cells in error.
    pub fn error_message(&self) -> Option<&str> {
        match &self.content {
            CellContent::Error(err) => Some(&err.message),
            _ => None,
        }
    }

    /// Formula expression derived from the raw text, regardless of any error
    /// the evaluator recorded.
    pub fn formula(&self) -> Option<&str> {
        formula_body(&self.raw)
    }

    /// Put the cell into an error state. `raw` is left alone.
    pub fn fail(&mut self, kind: CellErrorKind) {
        self.content = CellContent::Error(CellError::new(kind));
    }

    /// Rebuild `content` from `raw`, dropping errors recorded by evaluation.
    pub fn reclassify(&mut self) {
        *self = Cell::from_input(&self.raw);
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new_empty()
    }
}

/// Fixed-size grid of cells, indexed `[col][row]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create a grid where every cell is empty.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![vec![Cell::new_empty(); height]; width],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_in(&self, cell_ref: &CellRef) -> bool {
        cell_ref.col < self.width && cell_ref.row < self.height
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.cells.get(cell_ref.col)?.get(cell_ref.row)
    }

    pub fn get_mut(&mut self, cell_ref: &CellRef) -> Option<&mut Cell> {
        self.cells.get_mut(cell_ref.col)?.get_mut(cell_ref.row)
    }

    /// Replace the cell at `cell_ref`. Returns false when out of range.
    pub fn insert(&mut self, cell_ref: &CellRef, cell: Cell) -> bool {
        match self.get_mut(cell_ref) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// All coordinates in column-major order.
    pub fn refs(&self) -> impl Iterator<Item = CellRef> + use<> {
        let height = self.height;
        (0..self.width).flat_map(move |col| (0..height).map(move |row| CellRef::new(col, row)))
    }

    /// Non-empty cells in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(col, column)| {
            column
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.kind() != CellKind::Empty)
                .map(move |(row, cell)| (CellRef::new(col, row), cell))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_input_is_canonicalized() {
        let cell = Cell::from_input("10");
        assert_eq!(cell.raw(), "10.0");
        assert_eq!(cell.content, CellContent::Number(10.0));
    }

    #[test]
    fn test_whitespace_input_is_empty() {
        let cell = Cell::from_input("   ");
        assert_eq!(cell.raw(), EMPTY_CELL);
        assert_eq!(cell.kind(), CellKind::Empty);
        assert_eq!(cell.error_message(), None);
    }

    #[test]
    fn test_formula_input_keeps_raw() {
        let cell = Cell::from_input("= a0 + 5");
        assert_eq!(cell.raw(), "= a0 + 5");
        assert_eq!(cell.content, CellContent::Formula("a0 + 5".to_string()));
    }

    #[test]
    fn test_malformed_input_carries_message() {
        let cell = Cell::from_input("=5++5");
        assert_eq!(cell.kind(), CellKind::MalformedFormula);
        assert_eq!(cell.error_message(), Some(FORMULA_ERROR));
        assert_eq!(cell.raw(), "=5++5");
    }

    #[test]
    fn test_fail_and_reclassify() {
        let mut cell = Cell::from_input("=A0");
        cell.fail(CellErrorKind::Cycle);
        assert_eq!(cell.kind(), CellKind::CycleError);
        assert_eq!(cell.error_message(), Some(CYCLE_ERROR));
        assert_eq!(cell.formula(), Some("A0"));

        cell.reclassify();
        assert_eq!(cell.kind(), CellKind::Formula);
        assert_eq!(cell.error_message(), None);
    }

    #[test]
    fn test_grid_bounds() {
        let mut grid = Grid::new(2, 3);
        assert!(grid.is_in(&CellRef::new(1, 2)));
        assert!(!grid.is_in(&CellRef::new(2, 0)));
        assert!(grid.get(&CellRef::new(0, 3)).is_none());
        assert!(!grid.insert(&CellRef::new(5, 5), Cell::from_input("1")));
    }

    #[test]
    fn test_grid_zero_sized() {
        let grid = Grid::new(0, 0);
        assert_eq!(grid.refs().count(), 0);
        assert!(grid.get(&CellRef::new(0, 0)).is_none());
    }

    #[test]
    fn test_grid_iter_skips_empty_cells_column_major() {
        let mut grid = Grid::new(2, 2);
        grid.insert(&CellRef::new(1, 0), Cell::from_input("b"));
        grid.insert(&CellRef::new(0, 1), Cell::from_input("a"));
        let refs: Vec<_> = grid.iter().map(|(r, _)| r).collect();
        assert_eq!(refs, vec![CellRef::new(0, 1), CellRef::new(1, 0)]);
    }
}
