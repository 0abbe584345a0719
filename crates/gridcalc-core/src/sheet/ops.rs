use super::Sheet;
use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{self, Cell, CellRef, EMPTY_CELL, Evaluator};
use log::debug;

impl Sheet {
    /// Assign raw input to a cell, then re-evaluate the whole sheet.
    pub fn set(&mut self, x: usize, y: usize, input: &str) -> Result<()> {
        self.assign(x, y, input)?;
        self.eval_all();
        Ok(())
    }

    /// Replace the cell without re-evaluating.
    pub(crate) fn assign(&mut self, x: usize, y: usize, input: &str) -> Result<()> {
        let cell_ref = CellRef::new(x, y);
        if !self.grid.is_in(&cell_ref) {
            return Err(GridcalcError::OutOfBounds { col: x, row: y });
        }
        debug!("Updating cell {} with value: {}", cell_ref, input);
        self.grid.insert(&cell_ref, Cell::from_input(input));
        Ok(())
    }

    /// Evaluate one cell. Never fails: errors come back as sentinel strings
    /// and are recorded on the cell.
    pub fn eval(&mut self, x: usize, y: usize) -> String {
        Evaluator::new(&mut self.grid, &self.config).eval_cell(CellRef::new(x, y))
    }

    /// Re-evaluate every cell.
    pub fn eval_all(&mut self) {
        Evaluator::new(&mut self.grid, &self.config).eval_all();
    }

    /// Evaluated value of a cell; the empty marker when out of range.
    pub fn value(&mut self, x: usize, y: usize) -> String {
        if !self.is_in(x, y) {
            return EMPTY_CELL.to_string();
        }
        self.eval(x, y)
    }

    /// Longest formula reference chain from `(x, y)`; -1 on a cycle.
    pub fn depth(&self, x: usize, y: usize) -> i32 {
        engine::depth(&self.grid, CellRef::new(x, y))
    }

    /// Depth of every cell, indexed `[x][y]`.
    pub fn depths(&self) -> Vec<Vec<i32>> {
        engine::depths(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_engine::engine::{CYCLE_ERROR, CellKind, DivisionByZero, EngineConfig, FORMULA_ERROR};

    #[test]
    fn test_set_evaluates_sheet() {
        let mut sheet = Sheet::new(5, 5);
        sheet.set(0, 0, "10").unwrap();
        sheet.set(0, 1, "20").unwrap();
        sheet.set(0, 2, "=A0+A1").unwrap();
        assert_eq!(sheet.value(0, 2), "30.0");
        sheet.set(0, 3, "=A2*2").unwrap();
        assert_eq!(sheet.value(0, 3), "60.0");
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut sheet = Sheet::new(2, 2);
        assert!(matches!(
            sheet.set(2, 0, "1"),
            Err(GridcalcError::OutOfBounds { col: 2, row: 0 })
        ));
    }

    #[test]
    fn test_reference_to_undefined_cell() {
        let mut sheet = Sheet::new(1, 6);
        sheet.set(0, 3, "5").unwrap();
        sheet.set(0, 4, "=A3+A5").unwrap();
        assert_eq!(sheet.value(0, 4), FORMULA_ERROR);
        assert_eq!(sheet.get(0, 4).unwrap().kind(), CellKind::MalformedFormula);
    }

    #[test]
    fn test_sweep_marks_cycle_members() {
        let mut sheet = Sheet::new(2, 1);
        sheet.set(0, 0, "=B0").unwrap();
        sheet.set(1, 0, "=A0").unwrap();
        assert_eq!(sheet.get(0, 0).unwrap().kind(), CellKind::CycleError);
        assert_eq!(sheet.get(1, 0).unwrap().kind(), CellKind::CycleError);
        assert_eq!(sheet.value(1, 0), CYCLE_ERROR);
    }

    #[test]
    fn test_breaking_a_cycle_recovers() {
        let mut sheet = Sheet::new(2, 1);
        sheet.set(0, 0, "=B0+1").unwrap();
        sheet.set(1, 0, "=A0").unwrap();
        sheet.set(1, 0, "2").unwrap();
        assert_eq!(sheet.value(0, 0), "3.0");
        assert_eq!(sheet.get(0, 0).unwrap().kind(), CellKind::Formula);
    }

    #[test]
    fn test_value_out_of_range_is_empty() {
        let mut sheet = Sheet::new(1, 1);
        assert_eq!(sheet.value(4, 4), EMPTY_CELL);
    }

    #[test]
    fn test_configured_division_policy() {
        let config = EngineConfig {
            division_by_zero: DivisionByZero::Infinity,
        };
        let mut sheet = Sheet::with_config(1, 1, config);
        sheet.set(0, 0, "=5/0").unwrap();
        assert_eq!(sheet.value(0, 0), "inf");
    }

    #[test]
    fn test_depths() {
        let mut sheet = Sheet::new(3, 1);
        sheet.set(0, 0, "1").unwrap();
        sheet.set(1, 0, "=A0").unwrap();
        sheet.set(2, 0, "=B0+A0").unwrap();
        assert_eq!(sheet.depth(2, 0), 2);
        assert_eq!(sheet.depths(), vec![vec![0], vec![1], vec![2]]);
    }
}
