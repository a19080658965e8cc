//! Semantic type inference for dataset columns.
//!
//! Each column is classified into one [`SemanticType`] describing its
//! statistical role. The rules are evaluated in order and the first match wins:
//!
//! 1. the designated target column is `target`;
//! 2. temporal storage is `datetime`;
//! 3. numeric storage is `binary` with exactly two distinct non-missing values,
//!    `numerical` otherwise;
//! 4. fewer than `categorical_threshold` distinct non-missing values is
//!    `categorical`;
//! 5. object storage is `text` when the mean value length exceeds
//!    `text_length_threshold`, `categorical` otherwise;
//! 6. everything else is `unknown`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Float64Array, Int64Array};
//! use prep_guard::analyzers::inference::{SemanticType, TypeInferenceEngine};
//! use prep_guard::dataset::Dataset;
//!
//! let dataset = Dataset::try_from_columns(vec![
//!     ("smoker", Arc::new(Int64Array::from(vec![0, 1, 1, 0])) as ArrayRef),
//!     ("bmi", Arc::new(Float64Array::from(vec![21.5, 30.1, 25.0, 27.3])) as ArrayRef),
//! ])
//! .unwrap();
//!
//! let engine = TypeInferenceEngine::builder().categorical_threshold(20).build();
//! let types = engine.infer_types(&dataset, Some("bmi"));
//!
//! assert_eq!(types.get("smoker"), Some(SemanticType::Binary));
//! assert_eq!(types.get("bmi"), Some(SemanticType::Target));
//! ```

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, instrument, warn};

use crate::analyzers::errors::{AnalyzerError, AnalyzerResult};
use crate::dataset::{Column, Dataset, StorageKind};

/// How missing values contribute to the mean string length used to tell text
/// from categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLengthPolicy {
    /// Missing values are left out of the mean.
    #[default]
    Exclude,
    /// Missing values count as zero-length strings.
    Zero,
    /// Missing values count as the literal `"nan"`.
    Literal,
}

impl MissingLengthPolicy {
    const LITERAL_MISSING: &'static str = "nan";

    fn missing_length(self) -> Option<usize> {
        match self {
            Self::Exclude => None,
            Self::Zero => Some(0),
            Self::Literal => Some(Self::LITERAL_MISSING.len()),
        }
    }
}

/// Configuration for the type inference engine
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    /// Columns with fewer distinct values than this are categorical (default: 20)
    pub categorical_threshold: usize,
    /// Object columns whose mean value length exceeds this are text (default: 50.0)
    pub text_length_threshold: f64,
    /// Treatment of missing values in the mean length (default: exclude)
    pub missing_length_policy: MissingLengthPolicy,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: 20,
            text_length_threshold: 50.0,
            missing_length_policy: MissingLengthPolicy::Exclude,
        }
    }
}

/// Statistical role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// The designated prediction target
    Target,
    /// Dates and timestamps
    Datetime,
    /// Numeric with exactly two distinct values
    Binary,
    /// Numeric with any other number of distinct values
    Numerical,
    /// Low-cardinality or short-valued column
    Categorical,
    /// Free text with long values
    Text,
    /// Storage that no rule recognizes
    Unknown,
}

impl SemanticType {
    /// Get the tag as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            SemanticType::Target => "target",
            SemanticType::Datetime => "datetime",
            SemanticType::Binary => "binary",
            SemanticType::Numerical => "numerical",
            SemanticType::Categorical => "categorical",
            SemanticType::Text => "text",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Classification of a single column with the statistics that decided it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInference {
    /// Column name
    pub column: String,
    /// The inferred semantic type
    pub semantic_type: SemanticType,
    /// Raw storage classification
    pub storage_kind: StorageKind,
    /// Distinct non-missing values, when the rules needed them
    pub distinct_count: Option<usize>,
    /// Mean value length, when the text-length rule was evaluated
    pub mean_length: Option<f64>,
}

/// Column name to semantic type, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMap {
    entries: Vec<(String, SemanticType)>,
}

impl TypeMap {
    /// Returns the tag of a column.
    pub fn get(&self, column: &str) -> Option<SemanticType> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, t)| *t)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(column, tag)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SemanticType)> {
        self.entries.iter().map(|(name, t)| (name.as_str(), *t))
    }

    /// Names of all columns carrying `semantic_type`.
    pub fn columns_of(&self, semantic_type: SemanticType) -> Vec<&str> {
        self.iter()
            .filter(|(_, t)| *t == semantic_type)
            .map(|(name, _)| name)
            .collect()
    }

    fn insert(&mut self, column: String, semantic_type: SemanticType) {
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = semantic_type,
            None => self.entries.push((column, semantic_type)),
        }
    }
}

impl Serialize for TypeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, semantic_type) in &self.entries {
            map.serialize_entry(name, semantic_type)?;
        }
        map.end()
    }
}

/// Builder for TypeInferenceEngine
pub struct TypeInferenceEngineBuilder {
    config: InferenceConfig,
}

impl TypeInferenceEngineBuilder {
    /// Set the categorical cardinality threshold
    pub fn categorical_threshold(mut self, threshold: usize) -> Self {
        self.config.categorical_threshold = threshold;
        self
    }

    /// Set the mean length above which object columns are text
    pub fn text_length_threshold(mut self, threshold: f64) -> Self {
        self.config.text_length_threshold = threshold;
        self
    }

    /// Set how missing values enter the mean length
    pub fn missing_length_policy(mut self, policy: MissingLengthPolicy) -> Self {
        self.config.missing_length_policy = policy;
        self
    }

    /// Build the TypeInferenceEngine
    pub fn build(self) -> TypeInferenceEngine {
        TypeInferenceEngine {
            config: self.config,
        }
    }
}

/// Main type inference engine
#[derive(Debug, Clone, Default)]
pub struct TypeInferenceEngine {
    config: InferenceConfig,
}

impl TypeInferenceEngine {
    /// Create a new builder for TypeInferenceEngine
    pub fn builder() -> TypeInferenceEngineBuilder {
        TypeInferenceEngineBuilder {
            config: InferenceConfig::default(),
        }
    }

    /// Create a TypeInferenceEngine with default configuration
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer the semantic type of every column.
    #[instrument(skip(self, dataset), fields(columns = dataset.num_columns(), rows = dataset.num_rows()))]
    pub fn infer_types(&self, dataset: &Dataset, target_col: Option<&str>) -> TypeMap {
        let mut types = TypeMap::default();
        for column in dataset.columns() {
            let inference = self.classify(column, target_col);
            types.insert(inference.column, inference.semantic_type);
        }

        debug!(
            target_column = target_col,
            classified = types.len(),
            unknown = types.columns_of(SemanticType::Unknown).len(),
            "Completed type inference"
        );
        types
    }

    /// Infer the semantic type of one column by name.
    pub fn infer_column(
        &self,
        dataset: &Dataset,
        column_name: &str,
        target_col: Option<&str>,
    ) -> AnalyzerResult<ColumnInference> {
        let column = dataset
            .column(column_name)
            .ok_or_else(|| AnalyzerError::column_not_found(column_name))?;
        Ok(self.classify(column, target_col))
    }

    /// Apply the classification rules to a column. Never fails: columns whose
    /// values cannot be inspected are tagged unknown.
    pub fn classify(&self, column: Column<'_>, target_col: Option<&str>) -> ColumnInference {
        match self.try_classify(column, target_col) {
            Ok(inference) => inference,
            Err(e) => {
                warn!(
                    column = column.name(),
                    data_type = %column.data_type(),
                    error = %e,
                    "Could not inspect column values, tagging as unknown"
                );
                ColumnInference {
                    column: column.name().to_string(),
                    semantic_type: SemanticType::Unknown,
                    storage_kind: column.storage_kind(),
                    distinct_count: None,
                    mean_length: None,
                }
            }
        }
    }

    fn try_classify(
        &self,
        column: Column<'_>,
        target_col: Option<&str>,
    ) -> AnalyzerResult<ColumnInference> {
        let storage_kind = column.storage_kind();
        let mut inference = ColumnInference {
            column: column.name().to_string(),
            semantic_type: SemanticType::Unknown,
            storage_kind,
            distinct_count: None,
            mean_length: None,
        };

        if target_col == Some(column.name()) {
            inference.semantic_type = SemanticType::Target;
            return Ok(inference);
        }
        if storage_kind == StorageKind::Temporal {
            inference.semantic_type = SemanticType::Datetime;
            return Ok(inference);
        }

        let distinct = column.distinct_count()?;
        inference.distinct_count = Some(distinct);

        inference.semantic_type = if storage_kind == StorageKind::Numeric {
            if distinct == 2 {
                SemanticType::Binary
            } else {
                SemanticType::Numerical
            }
        } else if distinct < self.config.categorical_threshold {
            SemanticType::Categorical
        } else if storage_kind == StorageKind::Object {
            let mean_length = self.mean_length(&column.display_values()?);
            inference.mean_length = Some(mean_length);
            if mean_length > self.config.text_length_threshold {
                SemanticType::Text
            } else {
                SemanticType::Categorical
            }
        } else {
            SemanticType::Unknown
        };

        Ok(inference)
    }

    /// Mean character length of the values under the configured missing policy.
    fn mean_length(&self, values: &[Option<String>]) -> f64 {
        let missing_length = self.config.missing_length_policy.missing_length();
        let lengths: Vec<usize> = values
            .iter()
            .filter_map(|value| match value {
                Some(v) => Some(v.chars().count()),
                None => missing_length,
            })
            .collect();

        if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
        }
    }
}

/// Infer semantic types with the default configuration.
pub fn infer_types(dataset: &Dataset, target_col: Option<&str>) -> TypeMap {
    TypeInferenceEngine::new().infer_types(dataset, target_col)
}
