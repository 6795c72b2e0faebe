//! The metadata loader.
//!
//! [`MetadataLoader`] reads the contract workbook sheet by sheet into a [`MetadataStore`]:
//!
//! - [`MetadataLoader::validate_source`] checks the workbook is reachable
//! - [`MetadataLoader::load_all`] loads every sheet and reports a summary
//! - the per-sheet loaders can also be called individually
//!
//! Nothing here returns an error to the caller. Failures are reported to the configured
//! [`LoadObserver`] and surface as `false`.

pub mod config;
pub mod observability;
pub mod sheets;

use std::collections::HashSet;
#[cfg(feature = "excel")]
use std::path::Path;

use crate::error::MetadataResult;
use crate::types::{FeedMapping, MetadataStore, MetadataSummary, StagingMapping};
use crate::workbook::{Projection, ProjectedRow, WorkbookSource};

pub use config::{LoaderConfig, LoaderOptions, SheetNames};
pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, SheetStats,
    StdErrObserver, TracingObserver, severity_for_error,
};
pub use sheets::SheetKind;

/// Loads a contract workbook into typed records and answers queries over them.
///
/// ```
/// use contract_metadata::loader::{LoaderOptions, MetadataLoader};
/// use contract_metadata::workbook::InMemoryWorkbook;
///
/// let mut loader = MetadataLoader::with_source(
///     Box::new(InMemoryWorkbook::unreachable("missing.xlsx")),
///     LoaderOptions::default(),
/// );
/// assert!(!loader.load_all());
/// assert!(loader.store().feed_mappings.is_empty());
/// ```
pub struct MetadataLoader {
    source: Box<dyn WorkbookSource>,
    options: LoaderOptions,
    store: MetadataStore,
}

impl std::fmt::Debug for MetadataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataLoader")
            .field("source", &self.source.location())
            .field("options", &self.options)
            .field("summary", &self.store.summary())
            .finish()
    }
}

impl MetadataLoader {
    /// Loader for a spreadsheet file, with default options.
    #[cfg(feature = "excel")]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_source(
            Box::new(crate::workbook::ExcelWorkbook::new(path)),
            LoaderOptions::default(),
        )
    }

    /// Loader over any workbook source.
    pub fn with_source(source: Box<dyn WorkbookSource>, options: LoaderOptions) -> Self {
        Self {
            source,
            options,
            store: MetadataStore::new(),
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Everything loaded so far.
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Hand over the loaded records.
    pub fn into_store(self) -> MetadataStore {
        self.store
    }

    pub fn summary(&self) -> MetadataSummary {
        self.store.summary()
    }

    /// Check that the workbook is reachable. Reports the failure; never touches the store.
    pub fn validate_source(&self) -> bool {
        match self.source.check() {
            Ok(()) => true,
            Err(e) => {
                let ctx = LoadContext::workbook(self.source.location());
                self.report_failure(&ctx, &e);
                false
            }
        }
    }

    /// Load every sheet, in order.
    ///
    /// Returns `true` only if every sheet loaded. By default loading stops at the first failed
    /// sheet; with [`LoaderConfig::attempt_all_sheets`] the remaining sheets are still attempted.
    ///
    /// Calling this twice appends the mapping and rule records a second time.
    pub fn load_all(&mut self) -> bool {
        let ctx = LoadContext::workbook(self.source.location());
        if !self.validate_source() {
            self.with_observer(|o| o.on_load_failed(&ctx));
            return false;
        }

        let mut ok = true;
        for kind in SheetKind::LOAD_ORDER {
            if !ok && !self.options.config.attempt_all_sheets {
                break;
            }
            ok &= self.load_sheet(kind);
        }

        if ok {
            let summary = self.store.summary();
            self.with_observer(|o| o.on_summary(&ctx, &summary));
        } else {
            self.with_observer(|o| o.on_load_failed(&ctx));
        }
        ok
    }

    /// Load one sheet by kind.
    pub fn load_sheet(&mut self, kind: SheetKind) -> bool {
        match kind {
            SheetKind::FeedMapping => self.load_feed_mappings(),
            SheetKind::StagingMapping => self.load_staging_mappings(),
            SheetKind::Enumeration => self.load_enumerations(),
            SheetKind::Pattern => self.load_patterns(),
            SheetKind::Reconciliation => self.load_reconciliations(),
        }
    }

    /// Load the feed-to-staging mapping sheet, appending its records.
    pub fn load_feed_mappings(&mut self) -> bool {
        self.run_stage(SheetKind::FeedMapping, |projection, store| {
            let records = convert_rows(projection, sheets::feed_mapping)?;
            let n = records.len();
            store.feed_mappings.extend(records);
            Ok((n, Vec::new()))
        })
    }

    /// Load the staging-to-target mapping sheet, appending its records.
    pub fn load_staging_mappings(&mut self) -> bool {
        self.run_stage(SheetKind::StagingMapping, |projection, store| {
            let records = convert_rows(projection, sheets::staging_mapping)?;
            let n = records.len();
            store.staging_mappings.extend(records);
            Ok((n, Vec::new()))
        })
    }

    /// Load the enumeration sheet; each name replaces any earlier values for it.
    pub fn load_enumerations(&mut self) -> bool {
        self.run_stage(SheetKind::Enumeration, |projection, store| {
            let grouping = sheets::group_enumerations(projection)?;
            let n = grouping.sets.len();
            store.enumerations.extend(grouping.sets);
            Ok((n, grouping.warnings))
        })
    }

    /// Load the pattern-rule sheet, appending its records.
    pub fn load_patterns(&mut self) -> bool {
        self.run_stage(SheetKind::Pattern, |projection, store| {
            let records = convert_rows(projection, sheets::pattern_rule)?;
            let n = records.len();
            store.patterns.extend(records);
            Ok((n, Vec::new()))
        })
    }

    /// Load the reconciliation-rule sheet, appending its records.
    pub fn load_reconciliations(&mut self) -> bool {
        self.run_stage(SheetKind::Reconciliation, |projection, store| {
            let records = convert_rows(projection, sheets::reconciliation_rule)?;
            let n = records.len();
            store.reconciliation_rules.extend(records);
            Ok((n, Vec::new()))
        })
    }

    /// Feed mappings of one module (exact match).
    pub fn feed_mappings_by_module(&self, module: &str) -> Vec<&FeedMapping> {
        self.store.feed_mappings_by_module(module)
    }

    /// Staging mappings of one module (exact match).
    pub fn staging_mappings_by_module(&self, module: &str) -> Vec<&StagingMapping> {
        self.store.staging_mappings_by_module(module)
    }

    /// Values of an enumeration; empty if unknown.
    pub fn enumeration_values(&self, name: &str) -> &[String] {
        self.store.enumeration_values(name)
    }

    pub fn modules(&self) -> HashSet<&str> {
        self.store.modules()
    }

    pub fn database_names(&self) -> HashSet<&str> {
        self.store.database_names()
    }

    /// Read the sheet for `kind`, project its columns and hand it to `apply`.
    ///
    /// `apply` returns the record count plus warnings. It must only touch the store once the
    /// whole sheet converted, so a failed sheet leaves the store as it was.
    fn run_stage<F>(&mut self, kind: SheetKind, apply: F) -> bool
    where
        F: FnOnce(&Projection<'_>, &mut MetadataStore) -> MetadataResult<(usize, Vec<String>)>,
    {
        let sheet_name = self.options.config.sheets.name_of(kind).to_string();
        let ctx = LoadContext::sheet(self.source.location(), kind, &sheet_name);
        self.with_observer(|o| o.on_stage_started(&ctx));

        let strict = self.options.config.strict_columns;
        let outcome = self.source.read_sheet(&sheet_name).and_then(|table| {
            let projection = table.project(kind.columns(), strict)?;
            let mut warnings: Vec<String> = projection
                .extra_columns
                .iter()
                .map(|c| format!("unexpected column '{c}' ignored"))
                .collect();
            let (records, mut more) = apply(&projection, &mut self.store)?;
            warnings.append(&mut more);
            Ok((
                SheetStats {
                    rows: table.row_count(),
                    records,
                },
                warnings,
            ))
        });

        match outcome {
            Ok((stats, warnings)) => {
                for w in &warnings {
                    self.with_observer(|o| o.on_warning(&ctx, w));
                }
                self.with_observer(|o| o.on_sheet_loaded(&ctx, stats));
                true
            }
            Err(e) => {
                self.report_failure(&ctx, &e);
                false
            }
        }
    }

    fn report_failure(&self, ctx: &LoadContext, error: &crate::error::MetadataError) {
        let severity = severity_for_error(error);
        let threshold = self.options.config.alert_at_or_above;
        self.with_observer(|o| {
            o.on_sheet_failed(ctx, severity, error);
            if severity >= threshold {
                o.on_alert(ctx, severity, error);
            }
        });
    }

    fn with_observer(&self, f: impl FnOnce(&dyn LoadObserver)) {
        if let Some(obs) = self.options.observer.as_deref() {
            f(obs);
        }
    }
}

/// Convert every row with `convert`, failing on the first bad row.
fn convert_rows<T>(
    projection: &Projection<'_>,
    convert: fn(&ProjectedRow<'_>) -> MetadataResult<T>,
) -> MetadataResult<Vec<T>> {
    projection.rows().map(|row| convert(&row)).collect()
}
