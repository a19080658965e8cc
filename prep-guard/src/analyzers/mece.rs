//! Mutually exclusive, collectively exhaustive (MECE) label validation.
//!
//! Labels are checked against the dataset's row index rather than row
//! position. Several physical rows sharing an index value describe one logical
//! entity, so they must not carry different labels.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::analyzers::errors::{AnalyzerError, AnalyzerResult};
use crate::dataset::Dataset;

/// Which condition a diagnostic describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An index value carries more than one distinct label.
    Overlap,
    /// At least one row has no label.
    Unlabelled,
    /// Both conditions hold.
    Mece,
}

/// A single finding of the MECE check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Outcome of a MECE check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeceReport {
    /// The label column that was checked
    pub label_column: String,
    /// Number of rows inspected
    pub rows: usize,
    /// Rows whose label is missing
    pub unlabelled_rows: usize,
    /// Index values carrying more than one distinct label, in first-seen order
    pub overlapping_index_values: Vec<String>,
    /// Findings; a single `Mece` entry when the check passes
    pub diagnostics: Vec<Diagnostic>,
}

impl MeceReport {
    /// The verdict: true when labels are mutually exclusive and exhaustive.
    pub fn is_mece(&self) -> bool {
        !self.has_overlap() && !self.has_unlabelled()
    }

    pub fn has_overlap(&self) -> bool {
        !self.overlapping_index_values.is_empty()
    }

    pub fn has_unlabelled(&self) -> bool {
        self.unlabelled_rows > 0
    }

    pub fn diagnostic(&self, kind: DiagnosticKind) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.kind == kind)
    }
}

/// Validates a label column against MECE constraints.
#[derive(Debug, Clone)]
pub struct MeceChecker {
    label_column: String,
}

impl Default for MeceChecker {
    fn default() -> Self {
        Self::new("label")
    }
}

impl MeceChecker {
    pub fn new(label_column: impl Into<String>) -> Self {
        Self {
            label_column: label_column.into(),
        }
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Runs the missing-label and overlap checks.
    #[instrument(skip(self, dataset), fields(label_column = %self.label_column, rows = dataset.num_rows()))]
    pub fn check(&self, dataset: &Dataset) -> AnalyzerResult<MeceReport> {
        let column = dataset
            .column(&self.label_column)
            .ok_or_else(|| AnalyzerError::column_not_found(&self.label_column))?;

        let labels = column.display_values()?;
        let index = dataset.index_keys()?;

        let unlabelled_rows = labels.iter().filter(|l| l.is_none()).count();
        let overlapping_index_values = overlapping_groups(&index, &labels);

        let mut diagnostics = Vec::new();
        if !overlapping_index_values.is_empty() {
            warn!(
                overlapping = overlapping_index_values.len(),
                "Overlapping label assignments detected"
            );
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::Overlap,
                format!(
                    "Overlapping label assignments detected for {} index value(s)",
                    overlapping_index_values.len()
                ),
            ));
        }
        if unlabelled_rows > 0 {
            warn!(unlabelled_rows, "Unlabelled rows present");
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::Unlabelled,
                format!("Unlabelled rows present ({unlabelled_rows} row(s))"),
            ));
        }
        if diagnostics.is_empty() {
            info!("Labels are MECE");
            diagnostics.push(Diagnostic::new(DiagnosticKind::Mece, "Labels are MECE"));
        }

        Ok(MeceReport {
            label_column: self.label_column.clone(),
            rows: dataset.num_rows(),
            unlabelled_rows,
            overlapping_index_values,
            diagnostics,
        })
    }
}

/// Index values whose rows carry more than one distinct non-missing label.
/// Rows with a missing index value are not grouped.
fn overlapping_groups(index: &[Option<String>], labels: &[Option<String>]) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, HashSet<&str>> = HashMap::new();

    for (key, label) in index.iter().zip(labels) {
        let Some(key) = key.as_deref() else {
            continue;
        };
        let group = groups.entry(key).or_insert_with(|| {
            order.push(key);
            HashSet::new()
        });
        if let Some(label) = label.as_deref() {
            group.insert(label);
        }
    }

    order
        .into_iter()
        .filter(|key| groups.get(key).is_some_and(|labels| labels.len() > 1))
        .map(str::to_string)
        .collect()
}

/// Check `label_col` of `dataset` for MECE labels.
pub fn check_mece(dataset: &Dataset, label_col: &str) -> AnalyzerResult<MeceReport> {
    MeceChecker::new(label_col).check(dataset)
}
