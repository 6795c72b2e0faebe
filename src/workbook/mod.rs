//! Workbook access and cell coercion.
//!
//! A [`WorkbookSource`] hands out fully materialized [`SheetTable`]s by sheet name. Sources:
//! - [`excel::ExcelWorkbook`] (Cargo feature `excel`): `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`
//! - [`csv::CsvDirectory`]: one `<sheet>.csv` file per sheet
//! - [`InMemoryWorkbook`]: rows supplied directly as [`Cell`]s
//!
//! Sheets are read through a column [`Projection`], and individual cells are turned into typed
//! values by the lenient helpers in [`coerce`].

pub mod cell;
pub mod coerce;
pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod sheet;
pub mod source;

pub use cell::Cell;
pub use csv::CsvDirectory;
#[cfg(feature = "excel")]
pub use excel::ExcelWorkbook;
pub use sheet::{ProjectedRow, Projection, SheetRow, SheetTable};
pub use source::{InMemoryWorkbook, WorkbookSource};
