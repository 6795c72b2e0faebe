#![cfg(feature = "excel")]

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::error::{MetadataError, MetadataResult};

use super::cell::Cell;
use super::sheet::SheetTable;
use super::source::WorkbookSource;

/// File extensions (case-insensitive) readable by [`ExcelWorkbook`].
pub const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// A spreadsheet file on disk (`.xlsx`, `.xls`, `.ods`, ...).
///
/// The file is opened on the first sheet read and reused for all later reads.
pub struct ExcelWorkbook {
    path: PathBuf,
    workbook: Option<Sheets<BufReader<File>>>,
}

impl ExcelWorkbook {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            workbook: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&mut self) -> MetadataResult<&mut Sheets<BufReader<File>>> {
        if self.workbook.is_none() {
            self.check()?;
            self.workbook = Some(open_workbook_auto(&self.path)?);
        }
        self.workbook
            .as_mut()
            .ok_or_else(|| MetadataError::SourceNotFound {
                path: self.path.clone(),
            })
    }
}

impl std::fmt::Debug for ExcelWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExcelWorkbook")
            .field("path", &self.path)
            .field("opened", &self.workbook.is_some())
            .finish()
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn check(&self) -> MetadataResult<()> {
        if !self.path.is_file() {
            return Err(MetadataError::SourceNotFound {
                path: self.path.clone(),
            });
        }
        let ext = self
            .path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(MetadataError::UnsupportedFormat {
                path: self.path.clone(),
                extension: ext,
            });
        }
        Ok(())
    }

    fn read_sheet(&mut self, name: &str) -> MetadataResult<SheetTable> {
        let workbook = self.open()?;
        let available = workbook.sheet_names();
        if !available.iter().any(|s| s == name) {
            return Err(MetadataError::SheetNotFound {
                sheet: name.to_string(),
                available,
            });
        }

        let range = workbook.worksheet_range(name)?;
        sheet_from_range(name, &range)
    }
}

/// Convert a calamine range into a [`SheetTable`], keeping absolute 1-based row numbers.
fn sheet_from_range(name: &str, range: &calamine::Range<Data>) -> MetadataResult<SheetTable> {
    // The range starts at the first used cell, which is not necessarily A1.
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();
    SheetTable::from_rows_at(name, first_row + 1, rows)
}
