//! Cycle-safe evaluation of cells.
//!
//! Evaluating a formula cell resolves its references by evaluating the
//! referenced cells, then runs the arithmetic evaluator on the substituted
//! text. Formulas waiting on a reference are kept on an explicit stack of
//! frames rather than the call stack, so a chain of references is bounded by
//! the grid, not by the thread's stack size.
//!
//! Every failure is caught at the cell boundary: the cell is put into an
//! error state and the caller gets a sentinel string, so
//! [`Evaluator::eval_cell`] and [`Evaluator::eval_all`] never fail.

use log::debug;

use super::cell::{CYCLE_ERROR, CellContent, CellError, CellErrorKind, EMPTY_CELL, FORMULA_ERROR, Grid};
use super::cell_ref::CellRef;
use super::config::EngineConfig;
use super::cycle::EvalContext;
use super::error::EvalError;
use super::evaluate::evaluate;
use super::format::format_number;
use super::resolve::Substitution;
use super::tokenize::tokenize;

/// A formula cell part way through resolving its references.
struct Frame {
    cell_ref: CellRef,
    substitution: Substitution,
}

/// What opening a cell produced.
enum Opened {
    /// The cell's value, or why it has none.
    Value(Result<String, EvalError>),
    /// A formula whose references still need evaluating.
    Formula(Frame),
}

/// Evaluates cells of a grid, recording errors on the cells themselves.
pub struct Evaluator<'a> {
    grid: &'a mut Grid,
    config: &'a EngineConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(grid: &'a mut Grid, config: &'a EngineConfig) -> Self {
        Evaluator { grid, config }
    }

    /// Evaluate a single cell from a fresh context.
    ///
    /// Returns the cell's value, the empty marker for empty or out-of-range
    /// cells, or one of the error sentinels.
    pub fn eval_cell(&mut self, cell_ref: CellRef) -> String {
        if !self.grid.is_in(&cell_ref) {
            return EMPTY_CELL.to_string();
        }
        let mut ctx = EvalContext::new();
        let result = self.eval_in(cell_ref, &mut ctx);
        debug_assert!(ctx.is_empty(), "evaluation context leaked past {}", cell_ref);
        value_or_sentinel(result)
    }

    /// Re-evaluate every cell, column by column.
    ///
    /// Errors recorded by earlier evaluations are cleared first so that cells
    /// recover once whatever broke them has been fixed.
    pub fn eval_all(&mut self) {
        for cell_ref in self.grid.refs() {
            if let Some(cell) = self.grid.get_mut(&cell_ref)
                && matches!(cell.content, CellContent::Error(_))
            {
                cell.reclassify();
            }
        }
        for cell_ref in self.grid.refs() {
            self.eval_cell(cell_ref);
        }
    }

    fn eval_in(&mut self, cell_ref: CellRef, ctx: &mut EvalContext) -> Result<String, EvalError> {
        let mut frame = match self.open(cell_ref, ctx) {
            Opened::Value(result) => return result,
            Opened::Formula(frame) => frame,
        };
        let mut parents: Vec<Frame> = Vec::new();
        // Value of the reference `frame` is waiting on, once it is known.
        let mut child: Option<Result<String, EvalError>> = None;

        loop {
            let substituted = match child.take() {
                Some(result) => result.and_then(|value| frame.substitution.substitute(&value)),
                None => Ok(()),
            };
            let step = substituted.and_then(|()| frame.substitution.next_reference().transpose());

            let cell_ref = frame.cell_ref;
            let outcome = match step {
                Ok(Some(dep)) => {
                    match self.open(dep, ctx) {
                        Opened::Value(result) => child = Some(result),
                        Opened::Formula(next) => parents.push(std::mem::replace(&mut frame, next)),
                    }
                    continue;
                }
                Ok(None) => evaluate(tokenize(&frame.substitution.finish()), self.config),
                Err(err) => Err(err),
            };

            let result = self.close(cell_ref, outcome, ctx);
            match parents.pop() {
                Some(parent) => {
                    frame = parent;
                    child = Some(result);
                }
                None => return result,
            }
        }
    }

    /// Enter `cell_ref` on the evaluation path. Non-formula cells are left
    /// again straight away; formulas stay entered until [`Self::close`].
    fn open(&mut self, cell_ref: CellRef, ctx: &mut EvalContext) -> Opened {
        if !self.grid.is_in(&cell_ref) {
            return Opened::Value(Err(EvalError::InvalidReference(cell_ref.to_string())));
        }
        if !ctx.enter(cell_ref) {
            self.record_failure(&cell_ref, CellErrorKind::Cycle);
            return Opened::Value(Err(EvalError::CycleDetected(cell_ref)));
        }
        let value = match self.grid.get(&cell_ref) {
            None => Ok(EMPTY_CELL.to_string()),
            Some(cell) => match &cell.content {
                CellContent::Empty => Ok(EMPTY_CELL.to_string()),
                CellContent::Text(_) | CellContent::Number(_) => Ok(cell.raw().to_string()),
                CellContent::Error(err) => Err(stored_error(cell_ref, err)),
                CellContent::Formula(expr) => {
                    return Opened::Formula(Frame {
                        cell_ref,
                        substitution: Substitution::new(expr.as_str()),
                    });
                }
            },
        };
        ctx.leave(&cell_ref);
        Opened::Value(value)
    }

    /// Leave a formula cell, recording its failure if it has one.
    fn close(
        &mut self,
        cell_ref: CellRef,
        outcome: Result<f64, EvalError>,
        ctx: &mut EvalContext,
    ) -> Result<String, EvalError> {
        ctx.leave(&cell_ref);
        match outcome {
            Ok(value) => Ok(format_number(value)),
            Err(err) => {
                let kind = match err {
                    EvalError::CycleDetected(_) => CellErrorKind::Cycle,
                    _ => CellErrorKind::MalformedFormula,
                };
                debug!("Formula in cell {} failed: {}", cell_ref, err);
                self.record_failure(&cell_ref, kind);
                Err(err)
            }
        }
    }

    fn record_failure(&mut self, cell_ref: &CellRef, kind: CellErrorKind) {
        if let Some(cell) = self.grid.get_mut(cell_ref) {
            cell.fail(kind);
        }
    }
}

fn stored_error(cell_ref: CellRef, err: &CellError) -> EvalError {
    match err.kind {
        CellErrorKind::Cycle => EvalError::CycleDetected(cell_ref),
        CellErrorKind::MalformedFormula => {
            EvalError::malformed(format!("{} holds a malformed formula", cell_ref))
        }
    }
}

fn value_or_sentinel(result: Result<String, EvalError>) -> String {
    match result {
        Ok(value) => value,
        Err(EvalError::CycleDetected(_)) => CYCLE_ERROR.to_string(),
        Err(_) => FORMULA_ERROR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Cell, CellKind, DivisionByZero};

    fn grid_with(width: usize, height: usize, cells: &[(usize, usize, &str)]) -> Grid {
        let mut grid = Grid::new(width, height);
        for &(col, row, input) in cells {
            grid.insert(&CellRef::new(col, row), Cell::from_input(input));
        }
        grid
    }

    fn eval(grid: &mut Grid, col: usize, row: usize) -> String {
        let config = EngineConfig::default();
        Evaluator::new(grid, &config).eval_cell(CellRef::new(col, row))
    }

    fn kind(grid: &Grid, col: usize, row: usize) -> CellKind {
        grid.get(&CellRef::new(col, row)).unwrap().kind()
    }

    #[test]
    fn test_plain_values() {
        let mut grid = grid_with(2, 2, &[(0, 0, "10"), (1, 0, "hello")]);
        assert_eq!(eval(&mut grid, 0, 0), "10.0");
        assert_eq!(eval(&mut grid, 1, 0), "hello");
        assert_eq!(eval(&mut grid, 0, 1), EMPTY_CELL);
        assert_eq!(eval(&mut grid, 9, 9), EMPTY_CELL);
    }

    #[test]
    fn test_chained_formulas() {
        let mut grid = grid_with(
            4,
            1,
            &[(0, 0, "10"), (1, 0, "20"), (2, 0, "=A0+B0"), (3, 0, "=C0*2")],
        );
        assert_eq!(eval(&mut grid, 2, 0), "30.0");
        assert_eq!(eval(&mut grid, 3, 0), "60.0");
        assert_eq!(kind(&grid, 3, 0), CellKind::Formula);
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let mut grid = grid_with(1, 1, &[(0, 0, "=A0+1")]);
        assert_eq!(eval(&mut grid, 0, 0), CYCLE_ERROR);
        assert_eq!(kind(&grid, 0, 0), CellKind::CycleError);
        assert_eq!(
            grid.get(&CellRef::new(0, 0)).unwrap().error_message(),
            Some(CYCLE_ERROR)
        );
    }

    #[test]
    fn test_long_cycle_marks_every_member() {
        let mut grid = grid_with(3, 1, &[(0, 0, "=B0"), (1, 0, "=C0"), (2, 0, "=A0")]);
        assert_eq!(eval(&mut grid, 0, 0), CYCLE_ERROR);
        for col in 0..3 {
            assert_eq!(kind(&grid, col, 0), CellKind::CycleError);
        }
        assert_eq!(eval(&mut grid, 1, 0), CYCLE_ERROR);
    }

    #[test]
    fn test_cell_depending_on_cycle_is_cycle() {
        let mut grid = grid_with(3, 1, &[(0, 0, "=B0"), (1, 0, "=A0"), (2, 0, "=A0*2")]);
        assert_eq!(eval(&mut grid, 2, 0), CYCLE_ERROR);
    }

    #[test]
    fn test_shared_dependency_is_not_a_cycle() {
        let mut grid = grid_with(3, 1, &[(0, 0, "2"), (1, 0, "=A0*A0"), (2, 0, "=A0+B0")]);
        assert_eq!(eval(&mut grid, 2, 0), "6.0");
    }

    #[test]
    fn test_empty_reference_is_malformed() {
        let mut grid = grid_with(2, 1, &[(0, 0, "=B0+1")]);
        assert_eq!(eval(&mut grid, 0, 0), FORMULA_ERROR);
        assert_eq!(kind(&grid, 0, 0), CellKind::MalformedFormula);
        assert_eq!(grid.get(&CellRef::new(0, 0)).unwrap().raw(), "=B0+1");
    }

    #[test]
    fn test_out_of_range_reference_is_malformed() {
        let mut grid = grid_with(1, 1, &[(0, 0, "=Z9+1")]);
        assert_eq!(eval(&mut grid, 0, 0), FORMULA_ERROR);
    }

    #[test]
    fn test_text_reference_is_malformed() {
        let mut grid = grid_with(2, 1, &[(0, 0, "abc"), (1, 0, "=A0+1")]);
        assert_eq!(eval(&mut grid, 1, 0), FORMULA_ERROR);
    }

    #[test]
    fn test_division_by_zero_policy() {
        let mut grid = grid_with(1, 1, &[(0, 0, "=1/0")]);
        assert_eq!(eval(&mut grid, 0, 0), FORMULA_ERROR);

        let mut grid = grid_with(1, 1, &[(0, 0, "=1/0")]);
        let config = EngineConfig {
            division_by_zero: DivisionByZero::Infinity,
        };
        let value = Evaluator::new(&mut grid, &config).eval_cell(CellRef::new(0, 0));
        assert_eq!(value, "inf");
    }

    #[test]
    fn test_stored_error_is_not_recomputed() {
        let mut grid = grid_with(2, 1, &[(0, 0, "=B0"), (1, 0, "=A0")]);
        assert_eq!(eval(&mut grid, 0, 0), CYCLE_ERROR);
        grid.insert(&CellRef::new(1, 0), Cell::from_input("4"));
        assert_eq!(eval(&mut grid, 0, 0), CYCLE_ERROR);
    }

    #[test]
    fn test_eval_all_clears_resolved_errors() {
        let mut grid = grid_with(2, 1, &[(0, 0, "=B0"), (1, 0, "=A0")]);
        let config = EngineConfig::default();
        Evaluator::new(&mut grid, &config).eval_all();
        assert_eq!(kind(&grid, 0, 0), CellKind::CycleError);

        grid.insert(&CellRef::new(1, 0), Cell::from_input("4"));
        Evaluator::new(&mut grid, &config).eval_all();
        assert_eq!(kind(&grid, 0, 0), CellKind::Formula);
        assert_eq!(eval(&mut grid, 0, 0), "4.0");
    }

    fn chain_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        let refs: Vec<CellRef> = grid.refs().collect();
        grid.insert(&refs[0], Cell::from_input("1"));
        for pair in refs.windows(2) {
            grid.insert(&pair[1], Cell::from_input(&format!("={}+1", pair[0])));
        }
        grid
    }

    #[test]
    fn test_long_chain_does_not_exhaust_stack() {
        let mut grid = chain_grid(26, 100);
        assert_eq!(eval(&mut grid, 25, 99), "2600.0");
        assert_eq!(kind(&grid, 25, 99), CellKind::Formula);
    }

    #[test]
    fn test_long_cycle_across_whole_grid() {
        let mut grid = chain_grid(26, 100);
        grid.insert(&CellRef::new(0, 0), Cell::from_input("=Z99+1"));
        assert_eq!(eval(&mut grid, 25, 99), CYCLE_ERROR);
        assert_eq!(kind(&grid, 0, 0), CellKind::CycleError);
        assert_eq!(kind(&grid, 12, 50), CellKind::CycleError);
    }

    #[test]
    fn test_empty_reference_before_cycle_is_malformed() {
        let mut grid = grid_with(3, 1, &[(0, 0, "=B0"), (1, 0, "=C0+A0")]);
        assert_eq!(eval(&mut grid, 0, 0), FORMULA_ERROR);
        assert_eq!(kind(&grid, 0, 0), CellKind::MalformedFormula);
        assert_eq!(kind(&grid, 1, 0), CellKind::MalformedFormula);
    }

    #[test]
    fn test_negative_reference_values() {
        let mut grid = grid_with(
            4,
            1,
            &[(0, 0, "-3"), (1, 0, "=2-A0"), (2, 0, "=-A0"), (3, 0, "=2*A0")],
        );
        assert_eq!(eval(&mut grid, 1, 0), "5.0");
        assert_eq!(eval(&mut grid, 2, 0), "3.0");
        assert_eq!(eval(&mut grid, 3, 0), "-6.0");
    }
}
