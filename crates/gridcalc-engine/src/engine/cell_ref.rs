//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between cell names (e.g., "A0", "B2",
//! "z17") and zero-indexed column/row coordinates. A name is a single column
//! letter followed by the row number; rows count from zero, so `A0` is the
//! top-left cell.
//!
//! # Examples
//!
//! ```
//! use gridcalc_engine::engine::CellRef;
//!
//! let cell = CellRef::from_name("b3").unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::error::EvalError;

/// Number of addressable columns (`A` through `Z`).
pub const MAX_COLUMNS: usize = 26;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { col, row }
    }

    /// Parse a cell name (e.g., "A0", "c12"). The column letter is
    /// case-insensitive. Returns None if the input is invalid.
    pub fn from_name(name: &str) -> Option<CellRef> {
        let caps = name_re().captures(name)?;
        let letter = caps["letter"].to_ascii_uppercase().bytes().next()?;
        let row = caps["row"].parse::<usize>().ok()?;
        Some(CellRef::new((letter - b'A') as usize, row))
    }

    /// Column letter for an index (0 -> A, 25 -> Z), if it is addressable.
    pub fn col_to_letter(col: usize) -> Option<char> {
        (col < MAX_COLUMNS).then(|| (b'A' + col as u8) as char)
    }
}

fn name_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Za-z])(?<row>[0-9]+)$").expect("cell name regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EvalError::InvalidReference(s.to_string()))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match CellRef::col_to_letter(self.col) {
            Some(letter) => write!(f, "{}{}", letter, self.row),
            // Columns past Z have no name; fall back to raw coordinates.
            None => write!(f, "[{},{}]", self.col, self.row),
        }
    }
}
