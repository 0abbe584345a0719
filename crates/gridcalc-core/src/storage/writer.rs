//! Writer for the sheet text format

use crate::error::Result;
use gridcalc_engine::engine::Grid;
use std::fs;
use std::path::Path;

/// First line of every saved sheet; readers skip it.
pub const HEADER: &str = "gridcalc: spreadsheet - this line should be ignored";

/// Write a Grid to a sheet file
pub fn write_sheet(path: &Path, grid: &Grid) -> Result<()> {
    let content = write_sheet_content(grid);
    fs::write(path, content)?;
    Ok(())
}

/// Write a Grid to the sheet format string. Only non-empty cells are
/// written, column by column, with their raw content escaped so that each
/// cell stays on one line.
pub fn write_sheet_content(grid: &Grid) -> String {
    let mut lines = vec![HEADER.to_string()];

    for (cell_ref, cell) in grid.iter() {
        lines.push(format!(
            "{},{},{}",
            cell_ref.col,
            cell_ref.row,
            escape_raw(cell.raw())
        ));
    }

    lines.join("\n") + "\n"
}

fn escape_raw(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_engine::engine::{Cell, CellRef};

    #[test]
    fn test_write_header_only() {
        let grid = Grid::new(2, 2);
        assert_eq!(write_sheet_content(&grid), format!("{}\n", HEADER));
    }

    #[test]
    fn test_write_raw_content() {
        let mut grid = Grid::new(3, 3);
        grid.insert(&CellRef::new(0, 0), Cell::from_input("42"));
        grid.insert(&CellRef::new(1, 2), Cell::from_input("=a0*2"));
        grid.insert(&CellRef::new(2, 1), Cell::from_input("x, y"));
        let content = write_sheet_content(&grid);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec![HEADER, "0,0,42.0", "1,2,=a0*2", "2,1,x, y"]);
    }

    #[test]
    fn test_line_breaks_and_backslashes_are_escaped() {
        let mut grid = Grid::new(1, 2);
        grid.insert(&CellRef::new(0, 0), Cell::from_input("line one\nline two\r"));
        grid.insert(&CellRef::new(0, 1), Cell::from_input("C:\\temp"));
        let content = write_sheet_content(&grid);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![HEADER, "0,0,line one\\nline two\\r", "0,1,C:\\\\temp"]
        );
    }

    #[test]
    fn test_malformed_cells_keep_raw_text() {
        let mut grid = Grid::new(1, 1);
        grid.insert(&CellRef::new(0, 0), Cell::from_input("=5++5"));
        assert!(write_sheet_content(&grid).contains("0,0,=5++5"));
    }
}
