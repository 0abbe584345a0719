use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{Cell, CellRef, EngineConfig, Grid};

/// A fixed-size sheet of cells.
///
/// There is no stored dependency graph: references live in formula text and
/// are rediscovered on every evaluation.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub(crate) grid: Grid,
    pub(crate) config: EngineConfig,
}

impl Sheet {
    /// Create a sheet of `width` columns and `height` rows, all empty.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(width, height, EngineConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: EngineConfig) -> Self {
        Sheet {
            grid: Grid::new(width, height),
            config,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_in(&self, x: usize, y: usize) -> bool {
        self.grid.is_in(&CellRef::new(x, y))
    }

    /// The cell at `(x, y)`, or None when out of range.
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.grid.get(&CellRef::new(x, y))
    }

    /// The cell named `name` (e.g. `"b3"`), or None when out of range.
    pub fn get_by_name(&self, name: &str) -> Result<Option<&Cell>> {
        let cell_ref = CellRef::from_name(name)
            .ok_or_else(|| GridcalcError::InvalidReference(name.to_string()))?;
        Ok(self.grid.get(&cell_ref))
    }
}
