use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{MetadataError, MetadataResult};

use super::cell::Cell;
use super::sheet::SheetTable;

/// Read access to a multi-sheet workbook.
///
/// Every read returns a fully materialized [`SheetTable`] or fails; there are no partial reads.
pub trait WorkbookSource {
    /// Human-readable location used in reports (usually a path).
    fn location(&self) -> String;

    /// Check that the workbook is reachable and in a readable format.
    fn check(&self) -> MetadataResult<()>;

    /// Read one sheet by name.
    fn read_sheet(&mut self, name: &str) -> MetadataResult<SheetTable>;
}

/// A workbook held in memory, sheet by sheet.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    location: String,
    reachable: bool,
    sheets: BTreeMap<String, Vec<Vec<Cell>>>,
}

impl InMemoryWorkbook {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reachable: true,
            sheets: BTreeMap::new(),
        }
    }

    /// A workbook whose [`WorkbookSource::check`] fails with `SourceNotFound`.
    pub fn unreachable(location: impl Into<String>) -> Self {
        Self {
            reachable: false,
            ..Self::new(location)
        }
    }

    /// Add (or replace) a sheet. The first non-empty row is its header.
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.insert(name.into(), rows);
        self
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn check(&self) -> MetadataResult<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(MetadataError::SourceNotFound {
                path: PathBuf::from(&self.location),
            })
        }
    }

    fn read_sheet(&mut self, name: &str) -> MetadataResult<SheetTable> {
        let rows = self
            .sheets
            .get(name)
            .ok_or_else(|| MetadataError::SheetNotFound {
                sheet: name.to_string(),
                available: self.sheet_names(),
            })?;
        SheetTable::from_rows(name, rows.clone())
    }
}
