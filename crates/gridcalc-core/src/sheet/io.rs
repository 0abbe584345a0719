use super::Sheet;
use crate::error::Result;
use crate::storage::{Entry, parse_sheet, parse_sheet_content, write_sheet, write_sheet_content};
use log::warn;
use std::path::Path;

impl Sheet {
    /// Save every non-empty cell's raw content to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_sheet(path, &self.grid)
    }

    pub fn save_to_string(&self) -> String {
        write_sheet_content(&self.grid)
    }

    /// Load assignments from `path` on top of the current cells, then
    /// re-evaluate.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let entries = parse_sheet(path)?;
        self.apply_entries(entries);
        Ok(())
    }

    pub fn load_from_str(&mut self, content: &str) {
        self.apply_entries(parse_sheet_content(content));
    }

    fn apply_entries(&mut self, entries: Vec<Entry>) {
        for entry in entries {
            if let Err(err) = self.set(entry.col, entry.row, &entry.raw) {
                warn!("Skipping saved cell: {}", err);
            }
        }
        self.eval_all();
    }
}
