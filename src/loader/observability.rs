use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;
use crate::types::MetadataSummary;

use super::sheets::SheetKind;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (a sheet failed to load).
    Error,
    /// Critical error (the workbook itself is unreachable or unreadable).
    Critical,
}

/// Where a load event happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    /// Workbook location as reported by the source.
    pub source: String,
    /// Sheet being loaded, `None` for workbook-level events.
    pub stage: Option<SheetKind>,
    /// Configured sheet name for `stage`.
    pub sheet: Option<String>,
}

impl LoadContext {
    pub fn workbook(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            stage: None,
            sheet: None,
        }
    }

    pub fn sheet(source: impl Into<String>, stage: SheetKind, sheet: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            stage: Some(stage),
            sheet: Some(sheet.into()),
        }
    }

    fn sheet_label(&self) -> &str {
        self.sheet.as_deref().unwrap_or("-")
    }
}

/// Stats reported when a sheet loads successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetStats {
    /// Non-empty data rows read from the sheet.
    pub rows: usize,
    /// Records (or enumeration groups) produced.
    pub records: usize,
}

/// Observer interface for metadata loading.
///
/// Implementors can record metrics, logs, or trigger alerts. Every method has a no-op default.
pub trait LoadObserver: Send + Sync {
    /// Called before a sheet is read.
    fn on_stage_started(&self, _ctx: &LoadContext) {}

    /// Called when a sheet loads successfully.
    fn on_sheet_loaded(&self, _ctx: &LoadContext, _stats: SheetStats) {}

    /// Called when a sheet (or the workbook check) fails.
    fn on_sheet_failed(
        &self,
        _ctx: &LoadContext,
        _severity: LoadSeverity,
        _error: &MetadataError,
    ) {
    }

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_sheet_failed`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        self.on_sheet_failed(ctx, severity, error)
    }

    /// Called for non-fatal anomalies (skipped rows, unexpected columns).
    fn on_warning(&self, _ctx: &LoadContext, _message: &str) {}

    /// Called once after every sheet loaded.
    fn on_summary(&self, _ctx: &LoadContext, _summary: &MetadataSummary) {}

    /// Called once when a full load did not succeed.
    fn on_load_failed(&self, _ctx: &LoadContext) {}
}

/// Classify an error for reporting.
pub fn severity_for_error(e: &MetadataError) -> LoadSeverity {
    match e {
        MetadataError::SourceNotFound { .. } | MetadataError::Io(_) => LoadSeverity::Critical,
        _ => LoadSeverity::Error,
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_stage_started(&self, ctx: &LoadContext) {
        for o in &self.observers {
            o.on_stage_started(ctx);
        }
    }

    fn on_sheet_loaded(&self, ctx: &LoadContext, stats: SheetStats) {
        for o in &self.observers {
            o.on_sheet_loaded(ctx, stats);
        }
    }

    fn on_sheet_failed(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        for o in &self.observers {
            o.on_sheet_failed(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_warning(&self, ctx: &LoadContext, message: &str) {
        for o in &self.observers {
            o.on_warning(ctx, message);
        }
    }

    fn on_summary(&self, ctx: &LoadContext, summary: &MetadataSummary) {
        for o in &self.observers {
            o.on_summary(ctx, summary);
        }
    }

    fn on_load_failed(&self, ctx: &LoadContext) {
        for o in &self.observers {
            o.on_load_failed(ctx);
        }
    }
}

/// Emits structured `tracing` events. This is the loader's default observer.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_stage_started(&self, ctx: &LoadContext) {
        tracing::info!(source = %ctx.source, sheet = ctx.sheet_label(), "loading sheet");
    }

    fn on_sheet_loaded(&self, ctx: &LoadContext, stats: SheetStats) {
        tracing::info!(
            source = %ctx.source,
            sheet = ctx.sheet_label(),
            rows = stats.rows,
            records = stats.records,
            "sheet loaded"
        );
    }

    fn on_sheet_failed(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        tracing::error!(
            source = %ctx.source,
            sheet = ctx.sheet_label(),
            ?severity,
            error = %error,
            "failed to load sheet"
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        tracing::error!(
            source = %ctx.source,
            sheet = ctx.sheet_label(),
            ?severity,
            error = %error,
            alert = true,
            "metadata load alert"
        );
    }

    fn on_warning(&self, ctx: &LoadContext, message: &str) {
        tracing::warn!(source = %ctx.source, sheet = ctx.sheet_label(), "{message}");
    }

    fn on_summary(&self, ctx: &LoadContext, summary: &MetadataSummary) {
        tracing::info!(
            source = %ctx.source,
            feed_mappings = summary.feed_mappings,
            staging_mappings = summary.staging_mappings,
            enumerations = summary.enumerations,
            patterns = summary.patterns,
            reconciliation_rules = summary.reconciliation_rules,
            "metadata loaded"
        );
    }

    fn on_load_failed(&self, ctx: &LoadContext) {
        tracing::error!(source = %ctx.source, "failed to load metadata workbook");
    }
}

/// Logs load events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_stage_started(&self, ctx: &LoadContext) {
        eprintln!("[metadata][start] source={} sheet={}", ctx.source, ctx.sheet_label());
    }

    fn on_sheet_loaded(&self, ctx: &LoadContext, stats: SheetStats) {
        eprintln!(
            "[metadata][ok] source={} sheet={} rows={} records={}",
            ctx.source,
            ctx.sheet_label(),
            stats.rows,
            stats.records
        );
    }

    fn on_sheet_failed(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        eprintln!(
            "[metadata][{:?}] source={} sheet={} err={}",
            severity,
            ctx.source,
            ctx.sheet_label(),
            error
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        eprintln!(
            "[ALERT][metadata][{:?}] source={} sheet={} err={}",
            severity,
            ctx.source,
            ctx.sheet_label(),
            error
        );
    }

    fn on_warning(&self, ctx: &LoadContext, message: &str) {
        eprintln!("[metadata][warn] source={} sheet={} {}", ctx.source, ctx.sheet_label(), message);
    }

    fn on_summary(&self, ctx: &LoadContext, summary: &MetadataSummary) {
        eprintln!("[metadata][summary] source={} {}", ctx.source, summary);
    }

    fn on_load_failed(&self, ctx: &LoadContext) {
        eprintln!("[metadata][fail] source={}", ctx.source);
    }
}

/// Appends load events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_stage_started(&self, ctx: &LoadContext) {
        self.append_line(&format!(
            "{} start source={} sheet={}",
            unix_ts(),
            ctx.source,
            ctx.sheet_label()
        ));
    }

    fn on_sheet_loaded(&self, ctx: &LoadContext, stats: SheetStats) {
        self.append_line(&format!(
            "{} ok source={} sheet={} rows={} records={}",
            unix_ts(),
            ctx.source,
            ctx.sheet_label(),
            stats.rows,
            stats.records
        ));
    }

    fn on_sheet_failed(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        self.append_line(&format!(
            "{} fail severity={:?} source={} sheet={} err={}",
            unix_ts(),
            severity,
            ctx.source,
            ctx.sheet_label(),
            error
        ));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &MetadataError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} source={} sheet={} err={}",
            unix_ts(),
            severity,
            ctx.source,
            ctx.sheet_label(),
            error
        ));
    }

    fn on_warning(&self, ctx: &LoadContext, message: &str) {
        self.append_line(&format!(
            "{} warn source={} sheet={} {}",
            unix_ts(),
            ctx.source,
            ctx.sheet_label(),
            message
        ));
    }

    fn on_summary(&self, ctx: &LoadContext, summary: &MetadataSummary) {
        self.append_line(&format!("{} summary source={} {}", unix_ts(), ctx.source, summary));
    }

    fn on_load_failed(&self, ctx: &LoadContext) {
        self.append_line(&format!("{} load-failed source={}", unix_ts(), ctx.source));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
