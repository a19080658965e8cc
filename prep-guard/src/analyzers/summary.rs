//! Quick structural summary of a dataset: shape, per-column dtype and missing
//! counts, and the first few rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::dataset::{Dataset, StorageKind};
use crate::error::{ErrorContext, Result};

/// Per-column part of a [`DatasetSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Arrow data type, e.g. `Int64` or `Utf8`
    pub dtype: String,
    pub storage_kind: StorageKind,
    pub non_missing: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub column_summaries: Vec<ColumnSummary>,
    /// Leading rows rendered as strings; missing values are empty
    pub head: Vec<Vec<String>>,
    pub generated_at: DateTime<Utc>,
}

impl DatasetSummary {
    /// Summarizes `dataset`, keeping at most `head_rows` leading rows.
    #[instrument(skip(dataset), fields(rows = dataset.num_rows(), columns = dataset.num_columns()))]
    pub fn from_dataset(dataset: &Dataset, head_rows: usize) -> Result<Self> {
        let head_len = head_rows.min(dataset.num_rows());
        let mut head = vec![Vec::with_capacity(dataset.num_columns()); head_len];
        let mut column_summaries = Vec::with_capacity(dataset.num_columns());

        for column in dataset.columns() {
            let values = column
                .display_values()
                .with_context(|| format!("Failed to render column '{}'", column.name()))?;
            let missing = values.iter().filter(|v| v.is_none()).count();

            for (row, value) in head.iter_mut().zip(&values) {
                row.push(value.clone().unwrap_or_default());
            }

            column_summaries.push(ColumnSummary {
                name: column.name().to_string(),
                dtype: column.data_type().to_string(),
                storage_kind: column.storage_kind(),
                non_missing: values.len() - missing,
                missing,
            });
        }

        Ok(Self {
            rows: dataset.num_rows(),
            columns: dataset.num_columns(),
            column_summaries,
            head,
            generated_at: Utc::now(),
        })
    }

    /// Total missing values across all columns.
    pub fn total_missing(&self) -> usize {
        self.column_summaries.iter().map(|c| c.missing).sum()
    }
}
