//! Report formatting for analyzer results.
//!
//! Every analyzer returns a plain value; this module turns those values into
//! console text or JSON. Wrap the value in a [`Report`] and hand it to a
//! [`ReportFormatter`].
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array, StringArray};
//! use prep_guard::analyzers::check_mece;
//! use prep_guard::dataset::Dataset;
//! use prep_guard::formatters::{FormatterConfig, HumanFormatter, Report, ReportFormatter};
//!
//! # fn main() -> prep_guard::error::Result<()> {
//! let dataset = Dataset::try_from_columns(vec![
//!     ("label", Arc::new(StringArray::from(vec!["A", "B"])) as ArrayRef),
//! ])?;
//! let report = check_mece(&dataset, "label")?;
//!
//! let formatter = HumanFormatter::with_config(FormatterConfig::plain());
//! let text = formatter.format(&Report::from(&report))?;
//! assert!(text.contains("✅ Labels are MECE"));
//! # Ok(())
//! # }
//! ```

use std::fmt::Write;

use serde::Serialize;

use crate::analyzers::{
    DatasetSummary, DiagnosticKind, KeywordMatchMap, MeceReport, SemanticType, TypeMap,
};
use crate::logging::truncate_field;
use crate::prelude::*;

/// Configuration options for formatting reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Maximum number of list items to display per section (`None` for all)
    pub max_items: Option<usize>,
    /// Maximum rendered length of a single cell value in previews
    pub max_field_length: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            max_items: None,
            max_field_length: 32,
        }
    }
}

impl FormatterConfig {
    /// No colors, everything shown.
    pub fn plain() -> Self {
        Self {
            use_colors: false,
            ..Self::default()
        }
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            use_colors: false,
            max_items: Some(50),
            max_field_length: 32,
        }
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Sets the maximum number of items per section.
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    fn visible(&self, total: usize) -> usize {
        self.max_items.map_or(total, |max| max.min(total))
    }
}

/// Any analyzer result that can be formatted.
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    Types(&'a TypeMap),
    SensitiveColumns(&'a KeywordMatchMap),
    Mece(&'a MeceReport),
    Summary(&'a DatasetSummary),
}

impl<'a> From<&'a TypeMap> for Report<'a> {
    fn from(value: &'a TypeMap) -> Self {
        Self::Types(value)
    }
}

impl<'a> From<&'a KeywordMatchMap> for Report<'a> {
    fn from(value: &'a KeywordMatchMap) -> Self {
        Self::SensitiveColumns(value)
    }
}

impl<'a> From<&'a MeceReport> for Report<'a> {
    fn from(value: &'a MeceReport) -> Self {
        Self::Mece(value)
    }
}

impl<'a> From<&'a DatasetSummary> for Report<'a> {
    fn from(value: &'a DatasetSummary) -> Self {
        Self::Summary(value)
    }
}

impl Serialize for Report<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Types(r) => r.serialize(serializer),
            Self::SensitiveColumns(r) => r.serialize(serializer),
            Self::Mece(r) => r.serialize(serializer),
            Self::Summary(r) => r.serialize(serializer),
        }
    }
}

/// Trait for formatting reports into different output formats.
///
/// ```rust
/// use prep_guard::formatters::{Report, ReportFormatter};
///
/// struct KindOnly;
///
/// impl ReportFormatter for KindOnly {
///     fn format(&self, report: &Report<'_>) -> prep_guard::prelude::Result<String> {
///         Ok(match report {
///             Report::Types(_) => "types",
///             Report::SensitiveColumns(_) => "sensitive columns",
///             Report::Mece(_) => "mece",
///             Report::Summary(_) => "summary",
///         }
///         .to_string())
///     }
/// }
/// ```
pub trait ReportFormatter {
    /// Formats a report into a string representation.
    fn format(&self, report: &Report<'_>) -> Result<String>;
}

/// Formats reports as JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a pretty-printing JSON formatter.
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report<'_>) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        output.map_err(|e| PrepError::Serialization(format!("Failed to serialize report: {e}")))
    }
}

/// Formats reports in a human-readable format suitable for console output.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    /// Creates a new human formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.config.use_colors {
            format!("\x1b[{color}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn more(&self, out: &mut String, hidden: usize) -> std::fmt::Result {
        if hidden > 0 {
            writeln!(out, "   ... and {hidden} more")?;
        }
        Ok(())
    }

    fn write_types(&self, out: &mut String, types: &TypeMap) -> std::fmt::Result {
        writeln!(out, "🧬 Column Types ({} columns):", types.len())?;
        let shown = self.config.visible(types.len());
        for (column, semantic_type) in types.iter().take(shown) {
            let tag = match semantic_type {
                SemanticType::Target => self.paint(semantic_type.type_name(), "35"),
                SemanticType::Unknown => self.paint(semantic_type.type_name(), "33"),
                _ => semantic_type.type_name().to_string(),
            };
            writeln!(out, "   {column}: {tag}")?;
        }
        self.more(out, types.len() - shown)
    }

    fn write_sensitive(&self, out: &mut String, matches: &KeywordMatchMap) -> std::fmt::Result {
        if matches.is_empty() {
            return writeln!(out, "✅ No sensitive columns detected");
        }
        writeln!(
            out,
            "⚠️  {}",
            self.paint("Potentially sensitive columns:", "33")
        )?;
        let shown = self.config.visible(matches.len());
        for (keyword, columns) in matches.iter().take(shown) {
            writeln!(out, "   {keyword}: {}", columns.join(", "))?;
        }
        self.more(out, matches.len() - shown)
    }

    fn write_mece(&self, out: &mut String, report: &MeceReport) -> std::fmt::Result {
        for diagnostic in &report.diagnostics {
            let line = match diagnostic.kind {
                DiagnosticKind::Mece => format!("✅ {}", self.paint(&diagnostic.message, "32")),
                _ => format!("❌ {}", self.paint(&diagnostic.message, "31")),
            };
            writeln!(out, "{line}")?;
        }
        if report.has_overlap() {
            let shown = self.config.visible(report.overlapping_index_values.len());
            writeln!(
                out,
                "   Overlapping index values: {}",
                report.overlapping_index_values[..shown].join(", ")
            )?;
            self.more(out, report.overlapping_index_values.len() - shown)?;
        }
        Ok(())
    }

    fn write_summary(&self, out: &mut String, summary: &DatasetSummary) -> std::fmt::Result {
        writeln!(out, "📊 Dataset Summary:")?;
        writeln!(out, "   Shape: {} rows × {} columns", summary.rows, summary.columns)?;
        writeln!(out, "   Missing values: {}", summary.total_missing())?;
        writeln!(out, "   Generated: {}", summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;

        writeln!(out)?;
        writeln!(out, "📋 Columns:")?;
        let shown = self.config.visible(summary.column_summaries.len());
        for column in summary.column_summaries.iter().take(shown) {
            let missing = if column.missing > 0 {
                self.paint(&column.missing.to_string(), "31")
            } else {
                column.missing.to_string()
            };
            writeln!(
                out,
                "   {}: {} (non-missing: {}, missing: {missing})",
                column.name, column.dtype, column.non_missing
            )?;
        }
        self.more(out, summary.column_summaries.len() - shown)?;

        if !summary.head.is_empty() {
            writeln!(out)?;
            writeln!(out, "🔍 First {} rows:", summary.head.len())?;
            let header: Vec<&str> = summary
                .column_summaries
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            writeln!(out, "   {}", header.join(" | "))?;
            for row in &summary.head {
                let cells: Vec<String> = row
                    .iter()
                    .map(|cell| truncate_field(cell, self.config.max_field_length))
                    .collect();
                writeln!(out, "   {}", cells.join(" | "))?;
            }
        }
        Ok(())
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, report: &Report<'_>) -> Result<String> {
        let mut output = String::new();
        let written = match report {
            Report::Types(types) => self.write_types(&mut output, types),
            Report::SensitiveColumns(matches) => self.write_sensitive(&mut output, matches),
            Report::Mece(mece) => self.write_mece(&mut output, mece),
            Report::Summary(summary) => self.write_summary(&mut output, summary),
        };
        written.map_err(|e| PrepError::Internal(format!("Failed to format report: {e}")))?;
        Ok(output)
    }
}
