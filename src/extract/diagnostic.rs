//! Non-fatal extraction diagnostics

use serde::Serialize;
use std::fmt;

/// Part of an entry a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticField {
    Name,
    Category,
    Planets,
    Stats,
    Upload,
    /// The entry as a whole
    Entry,
}

impl fmt::Display for DiagnosticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Planets => "planets",
            Self::Stats => "stats",
            Self::Upload => "upload",
            Self::Entry => "entry",
        };
        f.write_str(s)
    }
}

/// A field- or entry-level anomaly found while extracting one resource
///
/// Diagnostics are advisory only. The record they refer to is still emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Zero-based index of the resource entry in document order
    pub entry: usize,

    /// Which field was affected
    pub field: DiagnosticField,

    /// Human-readable reason
    pub reason: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {} [{}]: {}", self.entry, self.field, self.reason)
    }
}

/// Collects diagnostics for the entry currently being extracted
pub(crate) struct EntryContext<'a> {
    index: usize,
    warnings: &'a mut Vec<Diagnostic>,
}

impl<'a> EntryContext<'a> {
    pub(crate) fn new(index: usize, warnings: &'a mut Vec<Diagnostic>) -> Self {
        Self { index, warnings }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Records a diagnostic against the current entry
    pub(crate) fn note(&mut self, field: DiagnosticField, reason: impl Into<String>) {
        let diagnostic = Diagnostic {
            entry: self.index,
            field,
            reason: reason.into(),
        };
        tracing::debug!("{}", diagnostic);
        self.warnings.push(diagnostic);
    }
}
