use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for workbook and loader operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Error type shared by the workbook sources and the metadata loader.
///
/// The loader never lets one of these escape its public surface: each failure is reported to the
/// configured [`crate::loader::LoadObserver`] and turned into a `false` return.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Underlying I/O error (e.g. permission denied while reading a sheet file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel workbook error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV sheet file error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration or export (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The workbook location does not exist.
    #[error("metadata source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The workbook location exists but is not a format any source can read.
    #[error("unsupported workbook format '{extension}' ({})", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// A required sheet is absent from the workbook.
    #[error("sheet '{sheet}' not found (available: {available:?})")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// A sheet does not have the expected header layout (missing or unexpected columns, or no
    /// header row).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A row could not be converted into its typed record.
    #[error(
        "failed to convert row {row} of sheet '{sheet}' column '{column}': {message} (raw='{raw}')"
    )]
    RowConversion {
        sheet: String,
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
