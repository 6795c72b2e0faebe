use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::MetadataResult;

use super::observability::{LoadObserver, LoadSeverity, TracingObserver};
use super::sheets::SheetKind;

/// Sheet names of the contract workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub feed_mapping: String,
    pub staging_mapping: String,
    pub enumeration: String,
    pub pattern: String,
    pub reconciliation: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            feed_mapping: "Feed_to_staging".to_string(),
            staging_mapping: "Staging to GRI".to_string(),
            enumeration: "Enumeration".to_string(),
            pattern: "Patterns".to_string(),
            reconciliation: "Reconciliations".to_string(),
        }
    }
}

impl SheetNames {
    pub fn name_of(&self, kind: SheetKind) -> &str {
        match kind {
            SheetKind::FeedMapping => &self.feed_mapping,
            SheetKind::StagingMapping => &self.staging_mapping,
            SheetKind::Enumeration => &self.enumeration,
            SheetKind::Pattern => &self.pattern,
            SheetKind::Reconciliation => &self.reconciliation,
        }
    }
}

/// Serializable loader settings.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```
/// use contract_metadata::loader::LoaderConfig;
///
/// let json = r#"{ "sheets": { "staging_mapping": "Staging" } }"#;
/// let cfg = LoaderConfig::from_json_str(json).unwrap();
/// assert_eq!(cfg.sheets.staging_mapping, "Staging");
/// assert_eq!(cfg.sheets.feed_mapping, "Feed_to_staging");
/// assert!(!cfg.strict_columns);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub sheets: SheetNames,
    /// Reject sheets carrying columns outside their expected layout.
    pub strict_columns: bool,
    /// Attempt every sheet even after one failed (more diagnostics, same overall result).
    pub attempt_all_sheets: bool,
    /// Severity at or above which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sheets: SheetNames::default(),
            strict_columns: false,
            attempt_all_sheets: false,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl LoaderConfig {
    pub fn from_json_str(s: &str) -> MetadataResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Options controlling a [`super::MetadataLoader`].
///
/// Use [`Default`] for common cases; it reports through a [`TracingObserver`].
#[derive(Clone)]
pub struct LoaderOptions {
    pub config: LoaderConfig,
    /// Observer for load reports; `None` silences reporting.
    pub observer: Option<Arc<dyn LoadObserver>>,
}

impl LoaderOptions {
    pub fn from_config(config: LoaderConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }
}

impl fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("config", &self.config)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            config: LoaderConfig::default(),
            observer: Some(Arc::new(TracingObserver)),
        }
    }
}
