//! gridcalc-core - Sheet document model + storage.

pub mod error;
pub mod sheet;
pub mod storage;

pub use error::{GridcalcError, Result};
pub use sheet::Sheet;

pub use gridcalc_engine::engine::{CellRef, DivisionByZero, EngineConfig};
