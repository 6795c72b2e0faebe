//! Typed records produced by the metadata loader.
//!
//! Each sheet of the contract workbook maps onto one record kind. All records are owned by a
//! single [`MetadataStore`], which is filled by one load pass and only read afterwards.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MetadataResult;

/// How a mapping writes into its target table.
///
/// Read leniently: a token other than `Insert`/`Append` is kept verbatim as [`Self::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// Rows replace the target content.
    Insert,
    /// Rows are appended to the target content.
    Append,
    /// Any other request token, trimmed.
    Other(String),
}

impl From<&str> for RequestKind {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "insert" => Self::Insert,
            "append" => Self::Append,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => f.write_str("Insert"),
            Self::Append => f.write_str("Append"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// One source-field-to-staging-field mapping (`Feed_to_staging` sheet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMapping {
    pub module: String,
    pub feed: String,
    pub field_name: String,
    pub db_name: String,
    pub db_table: String,
    pub data_type: String,
    pub nullable: bool,
    /// `None` when the cell is blank.
    pub request: Option<RequestKind>,
    pub default_value: Option<String>,
    pub enumeration: Option<String>,
    pub range_bottom: Option<f64>,
    pub range_top: Option<f64>,
    pub mandatory: bool,
    pub unique: bool,
}

/// One staging-to-target mapping (`Staging to GRI` sheet).
///
/// Mirrors [`FeedMapping`] with explicit source (staging) and target sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagingMapping {
    pub module: String,
    pub source_db: String,
    pub source_table: String,
    pub source_field: String,
    pub target_db: String,
    pub target_table: String,
    pub target_field: String,
    pub target_data_type: String,
    pub nullable: bool,
    /// `None` when the cell is blank.
    pub request: Option<RequestKind>,
    pub default_value: Option<String>,
    pub enumeration: Option<String>,
    pub range_bottom: Option<f64>,
    pub range_top: Option<f64>,
    pub mandatory: bool,
    pub unique: bool,
}

/// A named, ordered set of allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationSet {
    pub name: String,
    pub values: Vec<String>,
}

/// A pattern-validation rule applying one pattern to a list of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub name: String,
    pub columns: Vec<String>,
    pub pattern: String,
}

/// Scope of a reconciliation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReconciliationCategory {
    /// Compares two different tables.
    Inter,
    /// Compares columns within one table.
    Intra,
    /// Combination of both.
    Mix,
}

impl FromStr for ReconciliationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inter" => Ok(Self::Inter),
            "intra" => Ok(Self::Intra),
            "mix" => Ok(Self::Mix),
            _ => Err("expected rule type (Inter/Intra/Mix)".to_string()),
        }
    }
}

/// Aggregation compared between reconciliation source and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationOp {
    Sum,
    Count,
    Avg,
    Min,
    Max,
}

impl FromStr for AggregationOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUM" => Ok(Self::Sum),
            "COUNT" => Ok(Self::Count),
            "AVG" | "AVERAGE" => Ok(Self::Avg),
            "MIN" => Ok(Self::Min),
            "MAX" => Ok(Self::Max),
            _ => Err("expected operation (SUM/COUNT/AVG/MIN/MAX)".to_string()),
        }
    }
}

/// A reconciliation rule comparing an aggregate over a source column with a target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRule {
    pub name: String,
    pub category: ReconciliationCategory,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub operation: AggregationOp,
    pub tolerance: Option<f64>,
}

/// Record counts per collection, reported after a successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSummary {
    pub feed_mappings: usize,
    pub staging_mappings: usize,
    pub enumerations: usize,
    pub patterns: usize,
    pub reconciliation_rules: usize,
}

impl MetadataSummary {
    /// Serialize the counts as a compact JSON object.
    pub fn to_json(&self) -> MetadataResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for MetadataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "feed_mappings={}, staging_mappings={}, enumerations={}, patterns={}, \
             reconciliation_rules={}",
            self.feed_mappings,
            self.staging_mappings,
            self.enumerations,
            self.patterns,
            self.reconciliation_rules
        )
    }
}

/// Everything loaded from one contract workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataStore {
    pub feed_mappings: Vec<FeedMapping>,
    pub staging_mappings: Vec<StagingMapping>,
    pub enumerations: BTreeMap<String, EnumerationSet>,
    pub patterns: Vec<PatternRule>,
    pub reconciliation_rules: Vec<ReconciliationRule>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed mappings whose module equals `module` exactly.
    pub fn feed_mappings_by_module(&self, module: &str) -> Vec<&FeedMapping> {
        self.feed_mappings
            .iter()
            .filter(|m| m.module == module)
            .collect()
    }

    /// Staging mappings whose module equals `module` exactly.
    pub fn staging_mappings_by_module(&self, module: &str) -> Vec<&StagingMapping> {
        self.staging_mappings
            .iter()
            .filter(|m| m.module == module)
            .collect()
    }

    /// Allowed values of an enumeration, or an empty slice if the name is unknown.
    pub fn enumeration_values(&self, name: &str) -> &[String] {
        self.enumerations
            .get(name)
            .map(|e| e.values.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct modules across feed and staging mappings.
    pub fn modules(&self) -> HashSet<&str> {
        self.feed_mappings
            .iter()
            .map(|m| m.module.as_str())
            .chain(self.staging_mappings.iter().map(|m| m.module.as_str()))
            .collect()
    }

    /// Distinct database names: feed targets plus staging sources and targets.
    pub fn database_names(&self) -> HashSet<&str> {
        self.feed_mappings
            .iter()
            .map(|m| m.db_name.as_str())
            .chain(
                self.staging_mappings
                    .iter()
                    .flat_map(|m| [m.source_db.as_str(), m.target_db.as_str()]),
            )
            .collect()
    }

    /// Record counts per collection.
    pub fn summary(&self) -> MetadataSummary {
        MetadataSummary {
            feed_mappings: self.feed_mappings.len(),
            staging_mappings: self.staging_mappings.len(),
            enumerations: self.enumerations.len(),
            patterns: self.patterns.len(),
            reconciliation_rules: self.reconciliation_rules.len(),
        }
    }

    /// Pretty-printed JSON dump of the whole store.
    pub fn to_json_pretty(&self) -> MetadataResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
