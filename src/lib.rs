//! `contract-metadata` loads the metadata workbook of a data-integration contract into typed,
//! queryable in-memory records.
//!
//! The workbook describes how source feeds land in staging tables and how staging tables map to
//! target tables, together with the enumerations, patterns and reconciliation rules downstream
//! validation engines check against. Each sheet becomes one record kind:
//!
//! | Sheet | Record |
//! |---|---|
//! | `Feed_to_staging` | [`types::FeedMapping`] |
//! | `Staging to GRI` | [`types::StagingMapping`] |
//! | `Enumeration` | [`types::EnumerationSet`] |
//! | `Patterns` | [`types::PatternRule`] |
//! | `Reconciliations` | [`types::ReconciliationRule`] |
//!
//! Cells are coerced leniently: flags accept `Y`/`YES`/`TRUE`/`1`/`T` in any case and read
//! anything else as `false`, blank optional cells become `None`, and unparseable optional
//! numbers become `None` instead of failing the load.
//!
//! ## Quick example
//!
//! ```no_run
//! # #[cfg(feature = "excel")]
//! # fn main() {
//! use contract_metadata::MetadataLoader;
//!
//! let mut loader = MetadataLoader::new("contract_metadata.xlsx");
//! if loader.load_all() {
//!     for m in loader.feed_mappings_by_module("Customers") {
//!         println!("{}.{} -> {}.{}", m.feed, m.field_name, m.db_table, m.field_name);
//!     }
//!     println!("{:?}", loader.enumeration_values("Status"));
//! }
//! # }
//! # #[cfg(not(feature = "excel"))]
//! # fn main() {}
//! ```
//!
//! Without the `excel` feature, build the loader over a [`workbook::CsvDirectory`] or
//! [`workbook::InMemoryWorkbook`] with [`MetadataLoader::with_source`].
//!
//! ## Reporting
//!
//! The loader never returns errors; it reports them to a [`loader::LoadObserver`] and returns
//! `false`. The default observer emits `tracing` events; tests and embedders can inject their own:
//!
//! ```
//! use std::sync::Arc;
//!
//! use contract_metadata::loader::{LoaderOptions, MetadataLoader, StdErrObserver};
//! use contract_metadata::workbook::InMemoryWorkbook;
//!
//! let opts = LoaderOptions {
//!     observer: Some(Arc::new(StdErrObserver)),
//!     ..Default::default()
//! };
//! let mut loader = MetadataLoader::with_source(Box::new(InMemoryWorkbook::new("empty")), opts);
//! // No sheets at all: the first sheet is reported missing.
//! assert!(!loader.load_all());
//! ```
//!
//! ## Modules
//!
//! - [`loader`]: the loader, its configuration and observers
//! - [`workbook`]: workbook sources, sheets and cell coercion
//! - [`types`]: the record types and the [`types::MetadataStore`]
//! - [`error`]: the error type used internally and by workbook sources

pub mod error;
pub mod loader;
pub mod types;
pub mod workbook;

pub use error::{MetadataError, MetadataResult};
pub use loader::MetadataLoader;
pub use types::MetadataStore;
