//! Parser for the sheet text format.
//!
//! The first line is a header and is ignored. Every following line is
//! `col,row,raw content`; the content is everything after the second comma,
//! so it may itself contain commas. Backslashes, line feeds and carriage
//! returns in the content are written as `\\`, `\n` and `\r`.

use crate::error::{GridcalcError, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// One persisted cell assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub col: usize,
    pub row: usize,
    pub raw: String,
}

/// Parse a sheet file into its assignments, in file order.
pub fn parse_sheet(path: &Path) -> Result<Vec<Entry>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_sheet_content(&content))
}

/// Parse sheet content from a string. Lines that are not valid assignments
/// are skipped with a warning.
pub fn parse_sheet_content(content: &str) -> Vec<Entry> {
    content
        .lines()
        .enumerate()
        .skip(1)
        .filter_map(|(idx, line)| match parse_line(line, idx + 1) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping line: {}", err);
                None
            }
        })
        .collect()
}

fn parse_line(line: &str, line_num: usize) -> Result<Entry> {
    let mut parts = line.splitn(3, ',');
    let (Some(col), Some(row), Some(raw)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GridcalcError::Parse {
            line: line_num,
            message: "Expected 'col,row,content' format".to_string(),
        });
    };

    let coordinate = |text: &str| {
        text.trim().parse::<usize>().map_err(|_| GridcalcError::Parse {
            line: line_num,
            message: format!("Invalid coordinate: {}", text),
        })
    };

    Ok(Entry {
        col: coordinate(col)?,
        row: coordinate(row)?,
        raw: unescape_raw(raw),
    })
}

fn unescape_raw(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}
