//! Dataset analyzers used before model training.
//!
//! Each analyzer inspects an in-memory [`Dataset`](crate::dataset::Dataset)
//! and returns a plain report value. None of them modify the data.
//!
//! ## Available Analyzers
//!
//! - **Type Inference Engine** (`inference`): assigns every column one
//!   semantic type (target, datetime, binary, numerical, categorical, text)
//! - **Sensitive Column Scanner** (`fuzzy`): fuzzy-matches column names
//!   against keywords such as `gender` or `ethnicity`
//! - **MECE Checker** (`mece`): verifies that each index value carries
//!   exactly one label
//! - **Dataset Summary** (`summary`): shape, per-column dtypes and missing
//!   counts, and a preview of the first rows
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array, StringArray};
//! use prep_guard::analyzers::{check_mece, infer_types, scan_for_sensitive_columns, SemanticType};
//! use prep_guard::dataset::Dataset;
//!
//! # fn main() -> prep_guard::error::Result<()> {
//! let dataset = Dataset::try_from_columns(vec![
//!     ("record_id", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
//!     ("Gender_Code", Arc::new(StringArray::from(vec!["F", "M", "F"])) as ArrayRef),
//!     ("label", Arc::new(StringArray::from(vec!["A", "B", "A"])) as ArrayRef),
//! ])?
//! .set_index("record_id")?;
//!
//! let types = infer_types(&dataset, Some("label"));
//! assert_eq!(types.get("label"), Some(SemanticType::Target));
//!
//! let flagged = scan_for_sensitive_columns(&dataset.column_names(), &["gender"], 0.7)?;
//! assert_eq!(flagged.get("gender"), Some(&["gender_code".to_string()][..]));
//!
//! let report = check_mece(&dataset, "label")?;
//! assert!(report.is_mece());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod fuzzy;
pub mod inference;
pub mod mece;
pub mod summary;

pub use errors::{AnalyzerError, AnalyzerResult};
pub use fuzzy::{
    scan_for_sensitive_columns, similarity_ratio, KeywordMatchMap, ScanConfig,
    SensitiveColumnScanner, SensitiveColumnScannerBuilder,
};
pub use inference::{
    infer_types, ColumnInference, InferenceConfig, MissingLengthPolicy, SemanticType,
    TypeInferenceEngine, TypeInferenceEngineBuilder, TypeMap,
};
pub use mece::{check_mece, Diagnostic, DiagnosticKind, MeceChecker, MeceReport};
pub use summary::{ColumnSummary, DatasetSummary};
