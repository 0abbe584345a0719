//! File storage for sheets.

mod parser;
mod writer;

pub use parser::{Entry, parse_sheet, parse_sheet_content};
pub use writer::{HEADER, write_sheet, write_sheet_content};
