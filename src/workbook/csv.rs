use std::path::{Path, PathBuf};

use crate::error::{MetadataError, MetadataResult};

use super::cell::Cell;
use super::sheet::SheetTable;
use super::source::WorkbookSource;

/// A workbook stored as a directory of `<sheet name>.csv` files.
///
/// Every field is read as text; empty fields are empty cells.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file backing `sheet`.
    pub fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{sheet}.csv"))
    }

    /// Sheet names present in the directory, sorted.
    pub fn sheet_names(&self) -> MetadataResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem().and_then(|s| s.to_str())) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl WorkbookSource for CsvDirectory {
    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    fn check(&self) -> MetadataResult<()> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(MetadataError::SourceNotFound {
                path: self.dir.clone(),
            })
        }
    }

    fn read_sheet(&mut self, name: &str) -> MetadataResult<SheetTable> {
        let path = self.sheet_path(name);
        if !path.is_file() {
            return Err(MetadataError::SheetNotFound {
                sheet: name.to_string(),
                available: self.sheet_names()?,
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::text(field)
                        }
                    })
                    .collect(),
            );
        }

        SheetTable::from_rows(name, rows)
    }
}
