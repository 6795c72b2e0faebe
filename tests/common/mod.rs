#![allow(dead_code)]

use std::sync::Mutex;

use contract_metadata::MetadataError;
use contract_metadata::loader::{LoadContext, LoadObserver, LoadSeverity, SheetKind, SheetStats};
use contract_metadata::types::MetadataSummary;
use contract_metadata::workbook::{Cell, InMemoryWorkbook};

pub const FEED_HEADER: [&str; 14] = [
    "Modules",
    "Feed",
    "FieldName",
    "DBName",
    "DB Table",
    "DataType",
    "Nullable",
    "Request",
    "Default",
    "Enumeration",
    "RangeBottom",
    "RangeTop",
    "Mandatory",
    "Unique",
];

pub const STAGING_HEADER: [&str; 16] = [
    "Modules", "Stg_DBName", "Stg_DB Table", "STG_FieldName", "Trg_DBName", "Trg _DB Table",
    "Trg _FieldName", "Trg _DataType", "Nullable", "Request", "Default", "Enumeration",
    "RangeBottom", "RangeTop", "Mandatory", "Unique",
];

fn cells(values: &[&str]) -> Vec<Cell> {
    values
        .iter()
        .map(|s| if s.is_empty() { Cell::Empty } else { Cell::text(*s) })
        .collect()
}

/// Rows of a sheet as plain strings (empty string = empty cell), header first.
pub type SheetRows = Vec<Vec<&'static str>>;

#[rustfmt::skip]
pub fn feed_rows() -> SheetRows {
    vec![
        FEED_HEADER.to_vec(),
        vec!["ModuleA", "customers", "id", "STG", "stg_customers", "INT", "N", "Insert", "", "", "1", "", "Y", "Y"],
        vec!["ModuleA", "customers", "status", "STG", "stg_customers", "VARCHAR", "yes", "Insert", "Active", "Status", "", "", "TRUE", "n"],
        vec!["ModuleB", "orders", "amount", "RAW", "stg_orders", "DECIMAL", "", "append", "0", "", "0", "abc", "1", ""],
    ]
}

#[rustfmt::skip]
pub fn staging_rows() -> SheetRows {
    vec![
        STAGING_HEADER.to_vec(),
        vec!["ModuleA", "STG", "stg_customers", "id", "GRI", "customers", "customer_id", "INT", "N", "Insert", "", "", "", "", "Y", "Y"],
        vec!["ModuleC", "STG", "stg_orders", "amount", "DWH", "orders", "order_amount", "DECIMAL", "Y", "Append", "", "", "0", "1000000", "N", "N"],
    ]
}

pub fn enumeration_rows() -> SheetRows {
    vec![
        vec!["EnumerationName", "EnumValues"],
        vec!["Status", "Active"],
        vec!["Color", "Red"],
        vec!["Status", "Inactive"],
    ]
}

pub fn pattern_rows() -> SheetRows {
    vec![
        vec!["PatternName", "Columns", "Pattern"],
        vec!["email", "contact_email, billing_email", "^[^@]+@[^@]+$"],
    ]
}

#[rustfmt::skip]
pub fn reconciliation_rows() -> SheetRows {
    vec![
        vec!["RuleName", "RuleType", "SourceTable", "SourceColumn", "TargetTable", "TargetColumn", "Operation", "Tolerance"],
        vec!["order_totals", "Inter", "stg_orders", "amount", "orders", "order_amount", "SUM", "0.01"],
        vec!["row_count", "intra", "stg_customers", "id", "stg_customers", "id", "count", ""],
    ]
}

/// All contract sheets with their default names.
pub fn contract_sheets() -> Vec<(&'static str, SheetRows)> {
    vec![
        ("Feed_to_staging", feed_rows()),
        ("Staging to GRI", staging_rows()),
        ("Enumeration", enumeration_rows()),
        ("Patterns", pattern_rows()),
        ("Reconciliations", reconciliation_rows()),
    ]
}

pub fn to_cells(rows: &SheetRows) -> Vec<Vec<Cell>> {
    rows.iter().map(|r| cells(r)).collect()
}

/// In-memory workbook holding every contract sheet except those listed in `skip`.
pub fn contract_workbook_without(skip: &[&str]) -> InMemoryWorkbook {
    contract_sheets()
        .into_iter()
        .filter(|(name, _)| !skip.contains(name))
        .fold(InMemoryWorkbook::new("contract.xlsx"), |wb, (name, rows)| {
            wb.with_sheet(name, to_cells(&rows))
        })
}

pub fn contract_workbook() -> InMemoryWorkbook {
    contract_workbook_without(&[])
}

/// Observer recording every callback it receives.
#[derive(Default)]
pub struct RecordingObserver {
    pub started: Mutex<Vec<SheetKind>>,
    pub loaded: Mutex<Vec<(SheetKind, SheetStats)>>,
    pub failures: Mutex<Vec<(Option<String>, LoadSeverity, String)>>,
    pub alerts: Mutex<Vec<LoadSeverity>>,
    pub warnings: Mutex<Vec<String>>,
    pub summaries: Mutex<Vec<MetadataSummary>>,
    pub load_failures: Mutex<usize>,
}

impl LoadObserver for RecordingObserver {
    fn on_stage_started(&self, ctx: &LoadContext) {
        if let Some(kind) = ctx.stage {
            self.started.lock().unwrap().push(kind);
        }
    }

    fn on_sheet_loaded(&self, ctx: &LoadContext, stats: SheetStats) {
        if let Some(kind) = ctx.stage {
            self.loaded.lock().unwrap().push((kind, stats));
        }
    }

    fn on_sheet_failed(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        self.failures
            .lock()
            .unwrap()
            .push((ctx.sheet.clone(), severity, error.to_string()));
    }

    fn on_alert(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &MetadataError) {
        self.alerts.lock().unwrap().push(severity);
    }

    fn on_warning(&self, _ctx: &LoadContext, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn on_summary(&self, _ctx: &LoadContext, summary: &MetadataSummary) {
        self.summaries.lock().unwrap().push(*summary);
    }

    fn on_load_failed(&self, _ctx: &LoadContext) {
        *self.load_failures.lock().unwrap() += 1;
    }
}
