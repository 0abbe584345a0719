//! Gridcalc - evaluate a spreadsheet from the command line

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use gridcalc_core::Sheet;
use gridcalc_engine::engine::CellRef;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(version, about = "Evaluate a spreadsheet of numbers, text and arithmetic formulas")]
struct Cli {
    /// Sheet file to load
    file: Option<PathBuf>,

    /// Number of columns
    #[arg(long, default_value_t = 26)]
    width: usize,

    /// Number of rows
    #[arg(long, default_value_t = 100)]
    height: usize,

    /// Assign a cell after loading, e.g. `-s A0=10` or `-s "B0==A0*2"` (repeatable)
    #[arg(short, long = "set", value_name = "CELL=CONTENT", value_parser = parse_assignment)]
    set: Vec<Assignment>,

    /// Print dependency depths instead of values
    #[arg(long)]
    depth: bool,

    /// Save the resulting sheet to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (default: config.toml in the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// A `CELL=CONTENT` command-line assignment.
#[derive(Clone, Debug)]
struct Assignment {
    cell_ref: CellRef,
    content: String,
}

fn parse_assignment(arg: &str) -> std::result::Result<Assignment, String> {
    let (name, content) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected CELL=CONTENT, got '{}'", arg))?;
    let cell_ref = CellRef::from_name(name.trim())
        .ok_or_else(|| format!("invalid cell name '{}'", name.trim()))?;
    Ok(Assignment {
        cell_ref,
        content: content.to_string(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, warnings) = config::load_config(cli.config.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut sheet = Sheet::with_config(cli.width, cli.height, config);

    if let Some(path) = &cli.file {
        sheet
            .load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }

    for Assignment { cell_ref, content } in &cli.set {
        sheet
            .set(cell_ref.col, cell_ref.row, content)
            .with_context(|| format!("Cannot set {}", cell_ref))?;
    }

    if let Some(path) = &cli.output {
        sheet
            .save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.depth {
        print_depths(&sheet, &mut out)?;
    } else {
        print_values(&mut sheet, &mut out)?;
    }

    Ok(())
}

fn non_empty_cells(sheet: &Sheet) -> Vec<CellRef> {
    sheet.grid().iter().map(|(cell_ref, _)| cell_ref).collect()
}

/// One `NAME<TAB>value` line per non-empty cell, column by column.
fn print_values(sheet: &mut Sheet, out: &mut impl Write) -> io::Result<()> {
    for cell_ref in non_empty_cells(sheet) {
        let value = sheet.value(cell_ref.col, cell_ref.row);
        writeln!(out, "{}\t{}", cell_ref, value)?;
    }
    Ok(())
}

fn print_depths(sheet: &Sheet, out: &mut impl Write) -> io::Result<()> {
    for cell_ref in non_empty_cells(sheet) {
        writeln!(out, "{}\t{}", cell_ref, sheet.depth(cell_ref.col, cell_ref.row))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assignment_splits_on_first_equals() {
        let assignment = parse_assignment("b2==A0*2").unwrap();
        assert_eq!(assignment.cell_ref, CellRef::new(1, 2));
        assert_eq!(assignment.content, "=A0*2");
    }

    #[test]
    fn parse_assignment_rejects_bad_input() {
        assert!(parse_assignment("A0").is_err());
        assert!(parse_assignment("AA0=1").is_err());
    }

    #[test]
    fn print_values_lists_non_empty_cells() {
        let mut sheet = Sheet::new(2, 2);
        sheet.set(0, 0, "4").unwrap();
        sheet.set(1, 1, "=A0/0").unwrap();
        let mut out = Vec::new();
        print_values(&mut sheet, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A0\t4.0\nB1\t#ERR!\n");
    }

    #[test]
    fn print_depths_lists_non_empty_cells() {
        let mut sheet = Sheet::new(2, 1);
        sheet.set(0, 0, "=B0").unwrap();
        sheet.set(1, 0, "=A0").unwrap();
        let mut out = Vec::new();
        print_depths(&sheet, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A0\t-1\nB0\t-1\n");
    }
}
