//! Sheet layouts and row-to-record conversion.
//!
//! Each sheet declares the exact header names it needs. Headers are matched verbatim, including
//! the stray spaces some of them carry (`Trg _DB Table`).

use std::collections::BTreeMap;
use std::fmt;

use crate::error::MetadataResult;
use crate::types::{
    EnumerationSet, FeedMapping, PatternRule, ReconciliationRule, RequestKind, StagingMapping,
};
use crate::workbook::{ProjectedRow, Projection};

/// The sheets read by the loader, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    FeedMapping,
    StagingMapping,
    Enumeration,
    Pattern,
    Reconciliation,
}

impl SheetKind {
    pub const LOAD_ORDER: [SheetKind; 5] = [
        Self::FeedMapping,
        Self::StagingMapping,
        Self::Enumeration,
        Self::Pattern,
        Self::Reconciliation,
    ];

    /// Expected header names of the sheet.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::FeedMapping => feed::ALL,
            Self::StagingMapping => staging::ALL,
            Self::Enumeration => enumeration::ALL,
            Self::Pattern => pattern::ALL,
            Self::Reconciliation => reconciliation::ALL,
        }
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FeedMapping => "feed mapping",
            Self::StagingMapping => "staging mapping",
            Self::Enumeration => "enumeration",
            Self::Pattern => "pattern",
            Self::Reconciliation => "reconciliation",
        };
        f.write_str(s)
    }
}

/// Columns shared by both mapping sheets.
pub mod common {
    pub const MODULES: &str = "Modules";
    pub const NULLABLE: &str = "Nullable";
    pub const REQUEST: &str = "Request";
    pub const DEFAULT: &str = "Default";
    pub const ENUMERATION: &str = "Enumeration";
    pub const RANGE_BOTTOM: &str = "RangeBottom";
    pub const RANGE_TOP: &str = "RangeTop";
    pub const MANDATORY: &str = "Mandatory";
    pub const UNIQUE: &str = "Unique";
}

/// `Feed_to_staging` columns.
pub mod feed {
    use super::common::*;

    pub const FEED: &str = "Feed";
    pub const FIELD_NAME: &str = "FieldName";
    pub const DB_NAME: &str = "DBName";
    pub const DB_TABLE: &str = "DB Table";
    pub const DATA_TYPE: &str = "DataType";

    pub const ALL: &[&str] = &[
        MODULES,
        FEED,
        FIELD_NAME,
        DB_NAME,
        DB_TABLE,
        DATA_TYPE,
        NULLABLE,
        REQUEST,
        DEFAULT,
        ENUMERATION,
        RANGE_BOTTOM,
        RANGE_TOP,
        MANDATORY,
        UNIQUE,
    ];
}

/// `Staging to GRI` columns.
pub mod staging {
    use super::common::*;

    pub const STG_DB_NAME: &str = "Stg_DBName";
    pub const STG_DB_TABLE: &str = "Stg_DB Table";
    pub const STG_FIELD_NAME: &str = "STG_FieldName";
    pub const TRG_DB_NAME: &str = "Trg_DBName";
    pub const TRG_DB_TABLE: &str = "Trg _DB Table";
    pub const TRG_FIELD_NAME: &str = "Trg _FieldName";
    pub const TRG_DATA_TYPE: &str = "Trg _DataType";

    pub const ALL: &[&str] = &[
        MODULES,
        STG_DB_NAME,
        STG_DB_TABLE,
        STG_FIELD_NAME,
        TRG_DB_NAME,
        TRG_DB_TABLE,
        TRG_FIELD_NAME,
        TRG_DATA_TYPE,
        NULLABLE,
        REQUEST,
        DEFAULT,
        ENUMERATION,
        RANGE_BOTTOM,
        RANGE_TOP,
        MANDATORY,
        UNIQUE,
    ];
}

/// `Enumeration` columns.
pub mod enumeration {
    pub const NAME: &str = "EnumerationName";
    pub const VALUES: &str = "EnumValues";

    pub const ALL: &[&str] = &[NAME, VALUES];
}

/// `Patterns` columns.
pub mod pattern {
    pub const NAME: &str = "PatternName";
    /// Comma-separated list of column names.
    pub const COLUMNS: &str = "Columns";
    pub const PATTERN: &str = "Pattern";

    pub const ALL: &[&str] = &[NAME, COLUMNS, PATTERN];
}

/// `Reconciliations` columns.
pub mod reconciliation {
    pub const NAME: &str = "RuleName";
    pub const RULE_TYPE: &str = "RuleType";
    pub const SOURCE_TABLE: &str = "SourceTable";
    pub const SOURCE_COLUMN: &str = "SourceColumn";
    pub const TARGET_TABLE: &str = "TargetTable";
    pub const TARGET_COLUMN: &str = "TargetColumn";
    pub const OPERATION: &str = "Operation";
    pub const TOLERANCE: &str = "Tolerance";

    pub const ALL: &[&str] = &[
        NAME,
        RULE_TYPE,
        SOURCE_TABLE,
        SOURCE_COLUMN,
        TARGET_TABLE,
        TARGET_COLUMN,
        OPERATION,
        TOLERANCE,
    ];
}

pub(crate) fn feed_mapping(row: &ProjectedRow<'_>) -> MetadataResult<FeedMapping> {
    use common::*;
    use feed::*;

    Ok(FeedMapping {
        module: row.text(MODULES)?,
        feed: row.text(FEED)?,
        field_name: row.text(FIELD_NAME)?,
        db_name: row.text(DB_NAME)?,
        db_table: row.text(DB_TABLE)?,
        data_type: row.text(DATA_TYPE)?,
        nullable: row.flag(NULLABLE)?,
        request: row.optional_text(REQUEST)?.as_deref().map(RequestKind::from),
        default_value: row.optional_text(DEFAULT)?,
        enumeration: row.optional_text(ENUMERATION)?,
        range_bottom: row.optional_number(RANGE_BOTTOM)?,
        range_top: row.optional_number(RANGE_TOP)?,
        mandatory: row.flag(MANDATORY)?,
        unique: row.flag(UNIQUE)?,
    })
}

pub(crate) fn staging_mapping(row: &ProjectedRow<'_>) -> MetadataResult<StagingMapping> {
    use common::*;
    use staging::*;

    Ok(StagingMapping {
        module: row.text(MODULES)?,
        source_db: row.text(STG_DB_NAME)?,
        source_table: row.text(STG_DB_TABLE)?,
        source_field: row.text(STG_FIELD_NAME)?,
        target_db: row.text(TRG_DB_NAME)?,
        target_table: row.text(TRG_DB_TABLE)?,
        target_field: row.text(TRG_FIELD_NAME)?,
        target_data_type: row.text(TRG_DATA_TYPE)?,
        nullable: row.flag(NULLABLE)?,
        request: row.optional_text(REQUEST)?.as_deref().map(RequestKind::from),
        default_value: row.optional_text(DEFAULT)?,
        enumeration: row.optional_text(ENUMERATION)?,
        range_bottom: row.optional_number(RANGE_BOTTOM)?,
        range_top: row.optional_number(RANGE_TOP)?,
        mandatory: row.flag(MANDATORY)?,
        unique: row.flag(UNIQUE)?,
    })
}

pub(crate) fn pattern_rule(row: &ProjectedRow<'_>) -> MetadataResult<PatternRule> {
    let cell = row.cell(pattern::PATTERN)?;
    let pattern_text = row.text(pattern::PATTERN)?;
    if pattern_text.trim().is_empty() {
        return Err(row.conversion_error(pattern::PATTERN, cell, "pattern is empty"));
    }

    let columns = row
        .text(pattern::COLUMNS)?
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    Ok(PatternRule {
        name: row.text(pattern::NAME)?,
        columns,
        pattern: pattern_text,
    })
}

pub(crate) fn reconciliation_rule(row: &ProjectedRow<'_>) -> MetadataResult<ReconciliationRule> {
    use reconciliation::*;

    Ok(ReconciliationRule {
        name: row.text(NAME)?,
        category: row.parse(RULE_TYPE)?,
        source_table: row.text(SOURCE_TABLE)?,
        source_column: row.text(SOURCE_COLUMN)?,
        target_table: row.text(TARGET_TABLE)?,
        target_column: row.text(TARGET_COLUMN)?,
        operation: row.parse(OPERATION)?,
        tolerance: row.optional_number(TOLERANCE)?,
    })
}

/// Enumeration rows grouped by name.
#[derive(Debug, Default)]
pub(crate) struct EnumerationGrouping {
    pub sets: BTreeMap<String, EnumerationSet>,
    /// Non-fatal anomalies found while grouping.
    pub warnings: Vec<String>,
}

/// Group `(name, value)` rows into one ordered value list per name.
///
/// Rows without a name are skipped, blank values are dropped, and a name left with no values
/// is not stored.
pub(crate) fn group_enumerations(
    projection: &Projection<'_>,
) -> MetadataResult<EnumerationGrouping> {
    let mut grouping = EnumerationGrouping::default();
    let mut order: Vec<String> = Vec::new();
    let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for row in projection.rows() {
        let Some(name) = row.optional_text(enumeration::NAME)? else {
            grouping
                .warnings
                .push(format!("row {}: enumeration name is empty, row skipped", row.number()));
            continue;
        };
        let entry = values.entry(name.clone()).or_insert_with(|| {
            order.push(name.clone());
            Vec::new()
        });
        if let Some(value) = row.optional_text(enumeration::VALUES)? {
            entry.push(value);
        }
    }

    for name in order {
        let vals = values.remove(&name).unwrap_or_default();
        if vals.is_empty() {
            grouping
                .warnings
                .push(format!("enumeration '{name}' has no values and was not loaded"));
            continue;
        }
        grouping
            .sets
            .insert(name.clone(), EnumerationSet { name, values: vals });
    }

    Ok(grouping)
}
