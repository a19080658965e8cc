//! # prep-guard - Dataset checks before model training
//!
//! prep-guard inspects a tabular dataset before it is handed to a training
//! pipeline. It answers three questions about the data:
//!
//! - **Which kind of column is this?** The type inference engine tags every
//!   column as target, datetime, binary, numerical, categorical or text.
//! - **Does a column name hint at a sensitive attribute?** The scanner
//!   fuzzy-matches column names against keywords such as `gender`.
//! - **Are the labels MECE?** The MECE checker verifies that every index value
//!   carries exactly one label and that no row is unlabelled.
//!
//! Datasets are Arrow record batches held in memory. They are read from CSV
//! or Parquet through DataFusion, or from Excel workbooks behind the `excel`
//! feature.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prep_guard::prelude::*;
//! use prep_guard::analyzers::{check_mece, infer_types, scan_for_sensitive_columns};
//! use prep_guard::sources::{load_dataset, ProjectLayout};
//!
//! # async fn example() -> prep_guard::error::Result<()> {
//! let layout = ProjectLayout::discover(std::env::current_dir()?);
//! let dataset = load_dataset(layout.data_root().join("raw/students.csv")).await?;
//!
//! let types = infer_types(&dataset, Some("Target"));
//! let sensitive = scan_for_sensitive_columns(&dataset.column_names(), &["gender", "age"], 0.7)?;
//! let mece = check_mece(&dataset, "Target")?;
//!
//! let formatter = HumanFormatter::new();
//! println!("{}", formatter.format(&Report::from(&types))?);
//! println!("{}", formatter.format(&Report::from(&sensitive))?);
//! println!("{}", formatter.format(&Report::from(&mece))?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`dataset`**: the in-memory table with its row index
//! - **`analyzers`**: type inference, sensitive column scan, MECE check and
//!   dataset summary
//! - **`sources`**: loading, saving, project layout and checksums
//! - **`formatters`**: human-readable and JSON rendering of reports
//! - **`logging`**: `tracing` subscriber setup

pub mod analyzers;
pub mod dataset;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod security;
pub mod sources;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

pub use analyzers::{check_mece, infer_types, scan_for_sensitive_columns};
