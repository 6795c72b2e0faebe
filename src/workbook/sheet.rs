use crate::error::{MetadataError, MetadataResult};

use super::cell::Cell;
use super::coerce;

static EMPTY_CELL: Cell = Cell::Empty;

/// One data row of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based row number as shown by spreadsheet tools.
    pub number: usize,
    pub cells: Vec<Cell>,
}

/// A fully materialized sheet: header names plus the data rows below them.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl SheetTable {
    /// Build a table from raw rows whose first element is sheet row 1.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> MetadataResult<Self> {
        Self::from_rows_at(name, 1, rows)
    }

    /// Build a table from raw rows, numbering the first one `first_row_number`.
    ///
    /// - The header row is the first row with any non-empty cell.
    /// - Data rows that are entirely empty are dropped.
    pub fn from_rows_at(
        name: impl Into<String>,
        first_row_number: usize,
        rows: Vec<Vec<Cell>>,
    ) -> MetadataResult<Self> {
        let name = name.into();
        let mut iter = rows
            .into_iter()
            .enumerate()
            .map(|(idx0, cells)| (first_row_number + idx0, cells));

        let headers = iter
            .by_ref()
            .find(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
            .map(|(_, cells)| cells.iter().map(coerce::cell_to_text).collect::<Vec<_>>())
            .ok_or_else(|| MetadataError::SchemaMismatch {
                message: format!("sheet '{name}': no non-empty rows (no header row found)"),
            })?;

        let rows = iter
            .filter(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
            .map(|(number, cells)| SheetRow { number, cells })
            .collect();

        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Resolve the column positions of `columns` against this sheet's headers.
    ///
    /// Header names must match exactly; no trimming is applied. Any missing column is an error.
    /// Headers not listed in `columns` are returned in [`Projection::extra_columns`], or rejected
    /// when `strict` is set.
    pub fn project<'a>(
        &'a self,
        columns: &'static [&'static str],
        strict: bool,
    ) -> MetadataResult<Projection<'a>> {
        let mut indexes = Vec::with_capacity(columns.len());
        for col in columns {
            match self.headers.iter().position(|h| h == col) {
                Some(idx) => indexes.push(idx),
                None => {
                    return Err(MetadataError::SchemaMismatch {
                        message: format!(
                            "sheet '{}': missing required column '{}'. headers={:?}",
                            self.name, col, self.headers
                        ),
                    });
                }
            }
        }

        let extra_columns: Vec<String> = self
            .headers
            .iter()
            .filter(|h| !h.is_empty() && !columns.contains(&h.as_str()))
            .cloned()
            .collect();
        if strict && !extra_columns.is_empty() {
            return Err(MetadataError::SchemaMismatch {
                message: format!(
                    "sheet '{}': unexpected columns {:?}",
                    self.name, extra_columns
                ),
            });
        }

        Ok(Projection {
            table: self,
            columns,
            indexes,
            extra_columns,
        })
    }
}

/// A sheet whose expected columns have been located.
#[derive(Debug)]
pub struct Projection<'a> {
    table: &'a SheetTable,
    columns: &'static [&'static str],
    indexes: Vec<usize>,
    /// Headers present in the sheet but not part of the expected columns.
    pub extra_columns: Vec<String>,
}

impl<'a> Projection<'a> {
    pub fn rows(&self) -> impl Iterator<Item = ProjectedRow<'_>> + '_ {
        self.table.rows.iter().map(move |row| ProjectedRow {
            projection: self,
            row,
        })
    }

    fn slot(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| self.indexes[i])
    }
}

/// A data row read through a [`Projection`], giving typed access by column name.
#[derive(Debug)]
pub struct ProjectedRow<'a> {
    projection: &'a Projection<'a>,
    row: &'a SheetRow,
}

impl ProjectedRow<'_> {
    pub fn number(&self) -> usize {
        self.row.number
    }

    /// Raw cell of `column`. Short rows read as empty cells.
    pub fn cell(&self, column: &str) -> MetadataResult<&Cell> {
        let idx = self.projection.slot(column).ok_or_else(|| {
            self.conversion_error(column, &EMPTY_CELL, "column is not part of the sheet layout")
        })?;
        Ok(self.row.cells.get(idx).unwrap_or(&EMPTY_CELL))
    }

    pub fn text(&self, column: &str) -> MetadataResult<String> {
        self.cell(column).map(coerce::cell_to_text)
    }

    pub fn flag(&self, column: &str) -> MetadataResult<bool> {
        self.cell(column).map(coerce::parse_boolean)
    }

    pub fn optional_text(&self, column: &str) -> MetadataResult<Option<String>> {
        self.cell(column).map(coerce::parse_optional_string)
    }

    pub fn optional_number(&self, column: &str) -> MetadataResult<Option<f64>> {
        self.cell(column).map(coerce::parse_optional_float)
    }

    /// Parse the cell's text with `FromStr`, reporting failures as row conversion errors.
    pub fn parse<T>(&self, column: &str) -> MetadataResult<T>
    where
        T: std::str::FromStr<Err = String>,
    {
        let cell = self.cell(column)?;
        coerce::cell_to_text(cell)
            .parse::<T>()
            .map_err(|message| self.conversion_error(column, cell, &message))
    }

    pub fn conversion_error(&self, column: &str, cell: &Cell, message: &str) -> MetadataError {
        MetadataError::RowConversion {
            sheet: self.projection.table.name.clone(),
            row: self.row.number,
            column: column.to_string(),
            raw: cell.to_string(),
            message: message.to_string(),
        }
    }
}
